//! NYT Books API client.
//!
//! Uses the `lists/overview.json` endpoint, which returns a snapshot of
//! every list for a published date in a single response. The client
//! parses that snapshot once per period and serves individual list
//! fetches from it, so syncing N lists costs one outbound request.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::types::{parse_authors, BestsellerEntry};
use super::{BestsellerSource, SourceError};

/// NYT Books API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NytConfig {
    /// NYT API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.nytimes.com/svc/books/v3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

type ListIndex = HashMap<String, Vec<BestsellerEntry>>;

/// NYT Books API client.
pub struct NytClient {
    client: Client,
    base_url: String,
    api_key: String,
    /// Parsed overview per period, filled on first fetch.
    overview_cache: Mutex<HashMap<String, ListIndex>>,
}

impl NytClient {
    /// Create a new NYT client.
    pub fn new(config: NytConfig) -> Result<Self, SourceError> {
        if config.api_key.is_empty() {
            return Err(SourceError::NotConfigured(
                "NYT API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.nytimes.com/svc/books/v3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            overview_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Fetch and parse the overview snapshot for a period.
    async fn load_overview(&self, period: &str) -> Result<ListIndex, SourceError> {
        let url = format!("{}/lists/overview.json", self.base_url);

        debug!("NYT overview fetch: period='{}'", period);

        let mut request = self.client.get(&url).query(&[("api-key", &self.api_key)]);

        // "current" means the latest published lists, which is what the
        // endpoint returns when published_date is omitted.
        if period != "current" {
            request = request.query(&[("published_date", period)]);
        }

        let response = request.send().await.map_err(map_request_error)?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(SourceError::NotConfigured(
                "NYT API key rejected".to_string(),
            ));
        }
        if status == 429 {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let overview: OverviewResponse = response.json().await.map_err(|e| {
            SourceError::Parse(format!("Failed to parse overview response: {}", e))
        })?;

        Ok(index_overview(overview))
    }
}

#[async_trait::async_trait]
impl BestsellerSource for NytClient {
    fn name(&self) -> &str {
        "nyt"
    }

    async fn fetch(
        &self,
        list_name: &str,
        period: &str,
    ) -> Result<Vec<BestsellerEntry>, SourceError> {
        let mut cache = self.overview_cache.lock().await;

        if !cache.contains_key(period) {
            let index = self.load_overview(period).await?;
            debug!("NYT overview for '{}' has {} lists", period, index.len());
            cache.insert(period.to_string(), index);
        }

        let index = cache.get(period).expect("just inserted");
        index
            .get(list_name)
            .cloned()
            .ok_or_else(|| SourceError::InvalidListName(list_name.to_string()))
    }
}

fn map_request_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else {
        SourceError::Unavailable(e.to_string())
    }
}

/// Index an overview snapshot by encoded list name.
fn index_overview(overview: OverviewResponse) -> ListIndex {
    let mut index = ListIndex::new();
    for list in overview.results.lists {
        let list_name = list.list_name_encoded;
        let entries = list
            .books
            .into_iter()
            .map(|b| book_to_entry(b, &list_name))
            .collect();
        index.insert(list_name, entries);
    }
    index
}

/// Convert one raw book record. Malformed or partial records become
/// entries with empty fields, never an error.
fn book_to_entry(book: BookResult, list_name: &str) -> BestsellerEntry {
    // Prefer 'author', fall back to 'contributor' (often "by ...")
    let credit = match (&book.author, &book.contributor) {
        (Some(a), _) if !a.trim().is_empty() => a.clone(),
        (_, Some(c)) => c.clone(),
        _ => String::new(),
    };
    let author = parse_authors(&credit).join(", ");

    let isbn_13 = book.primary_isbn13.filter(|s| !s.trim().is_empty());
    let isbn_10 = book.primary_isbn10.filter(|s| !s.trim().is_empty());

    BestsellerEntry {
        title: book.title.unwrap_or_default().trim().to_string(),
        author,
        isbn_10,
        isbn_13,
        rank: book.rank.unwrap_or(0),
        list_name: list_name.to_string(),
    }
}

// ============================================================================
// NYT API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OverviewResponse {
    results: OverviewResults,
}

#[derive(Debug, Deserialize)]
struct OverviewResults {
    #[serde(default)]
    lists: Vec<ListResult>,
}

#[derive(Debug, Deserialize)]
struct ListResult {
    list_name_encoded: String,
    #[serde(default)]
    books: Vec<BookResult>,
}

#[derive(Debug, Deserialize)]
struct BookResult {
    title: Option<String>,
    author: Option<String>,
    contributor: Option<String>,
    primary_isbn13: Option<String>,
    primary_isbn10: Option<String>,
    rank: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OVERVIEW: &str = r#"{
        "status": "OK",
        "results": {
            "published_date": "2026-08-23",
            "lists": [
                {
                    "list_name_encoded": "hardcover-fiction",
                    "books": [
                        {
                            "title": "THE NIGHT WATCHMAN",
                            "author": "Louise Erdrich",
                            "contributor": "by Louise Erdrich",
                            "primary_isbn13": "9780062671189",
                            "primary_isbn10": "0062671189",
                            "rank": 1
                        },
                        {
                            "title": "NO ISBN BOOK",
                            "contributor": "by Jane Doe and John Roe",
                            "primary_isbn13": "",
                            "rank": 2
                        }
                    ]
                },
                {
                    "list_name_encoded": "audio-fiction",
                    "books": []
                }
            ]
        }
    }"#;

    fn sample_index() -> ListIndex {
        let overview: OverviewResponse = serde_json::from_str(SAMPLE_OVERVIEW).unwrap();
        index_overview(overview)
    }

    #[test]
    fn test_index_overview_by_encoded_name() {
        let index = sample_index();
        assert_eq!(index.len(), 2);
        assert!(index.contains_key("hardcover-fiction"));
        assert!(index.contains_key("audio-fiction"));
        assert!(index["audio-fiction"].is_empty());
    }

    #[test]
    fn test_book_conversion_prefers_author_field() {
        let index = sample_index();
        let entry = &index["hardcover-fiction"][0];
        assert_eq!(entry.title, "THE NIGHT WATCHMAN");
        assert_eq!(entry.author, "Louise Erdrich");
        assert_eq!(entry.isbn_13.as_deref(), Some("9780062671189"));
        assert_eq!(entry.isbn_10.as_deref(), Some("0062671189"));
        assert_eq!(entry.rank, 1);
        assert_eq!(entry.list_name, "hardcover-fiction");
    }

    #[test]
    fn test_book_conversion_tolerates_missing_fields() {
        let index = sample_index();
        let entry = &index["hardcover-fiction"][1];
        // Falls back to contributor and parses the credit
        assert_eq!(entry.author, "Jane Doe, John Roe");
        // Empty ISBN strings become None
        assert!(entry.isbn_13.is_none());
        assert!(entry.isbn_10.is_none());
        assert_eq!(entry.rank, 2);
    }

    #[test]
    fn test_book_conversion_all_fields_missing() {
        let book: BookResult = serde_json::from_str("{}").unwrap();
        let entry = book_to_entry(book, "test-list");
        assert_eq!(entry.title, "");
        assert_eq!(entry.author, "");
        assert!(entry.isbn_13.is_none());
        assert_eq!(entry.rank, 0);
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = NytClient::new(NytConfig {
            api_key: String::new(),
            base_url: None,
            timeout_secs: 30,
        });
        assert!(matches!(result, Err(SourceError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_fetch_unknown_list_from_cache() {
        let client = NytClient::new(NytConfig {
            api_key: "key".to_string(),
            base_url: None,
            timeout_secs: 30,
        })
        .unwrap();

        // Pre-fill the cache so no network call happens
        client
            .overview_cache
            .lock()
            .await
            .insert("current".to_string(), sample_index());

        let entries = client.fetch("hardcover-fiction", "current").await.unwrap();
        assert_eq!(entries.len(), 2);

        let err = client.fetch("no-such-list", "current").await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidListName(_)));
    }
}
