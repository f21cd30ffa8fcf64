use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// One entry of a bestseller list, as reported by the provider.
///
/// Produced fresh on every run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestsellerEntry {
    pub title: String,
    /// Author credit, possibly several names joined with ", ".
    /// Empty when the provider omits it.
    pub author: String,
    pub isbn_10: Option<String>,
    pub isbn_13: Option<String>,
    /// Rank on `list_name`, 1-based. 0 when the provider omits it.
    pub rank: u32,
    /// Encoded list name this entry came from.
    pub list_name: String,
}

impl BestsellerEntry {
    /// Key used to deduplicate entries across lists.
    ///
    /// ISBN-13 wins, then ISBN-10, then lowercased title|author.
    pub fn dedup_key(&self) -> String {
        if let Some(isbn) = &self.isbn_13 {
            if !isbn.is_empty() {
                return isbn.clone();
            }
        }
        if let Some(isbn) = &self.isbn_10 {
            if !isbn.is_empty() {
                return isbn.clone();
            }
        }
        format!("{}|{}", self.title, self.author).to_lowercase()
    }
}

/// Parse an author credit like "by James Patterson and Duane Swierczynski"
/// into individual names. Strips the leading "by", splits on commas,
/// "and" and "with", and de-dupes case-insensitively preserving order.
pub fn parse_authors(credit: &str) -> Vec<String> {
    if credit.trim().is_empty() {
        return Vec::new();
    }

    let leading_by = Regex::new(r"(?i)^\s*by\b[:\s]*").unwrap();
    let separators = Regex::new(r"(?i)\s*(?:,|\band\b|\bwith\b)\s*").unwrap();

    let stripped = leading_by.replace(credit.trim(), "");

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for part in separators.split(&stripped) {
        let name = part.trim();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if seen.insert(key) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, author: &str, isbn_13: Option<&str>, isbn_10: Option<&str>) -> BestsellerEntry {
        BestsellerEntry {
            title: title.to_string(),
            author: author.to_string(),
            isbn_10: isbn_10.map(String::from),
            isbn_13: isbn_13.map(String::from),
            rank: 1,
            list_name: "hardcover-fiction".to_string(),
        }
    }

    #[test]
    fn test_parse_authors_single() {
        assert_eq!(parse_authors("by Louise Erdrich"), vec!["Louise Erdrich"]);
    }

    #[test]
    fn test_parse_authors_multiple_separators() {
        let authors = parse_authors("by James Patterson and Duane Swierczynski");
        assert_eq!(authors, vec!["James Patterson", "Duane Swierczynski"]);

        let authors = parse_authors("Trey Gowdy with Christopher Greyson");
        assert_eq!(authors, vec!["Trey Gowdy", "Christopher Greyson"]);

        let authors = parse_authors("A, B and C");
        assert_eq!(authors, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_authors_dedupe() {
        let authors = parse_authors("Jane Doe and jane doe");
        assert_eq!(authors, vec!["Jane Doe"]);
    }

    #[test]
    fn test_parse_authors_empty() {
        assert!(parse_authors("").is_empty());
        assert!(parse_authors("   ").is_empty());
        assert!(parse_authors("by ").is_empty());
    }

    #[test]
    fn test_parse_authors_no_leading_by() {
        // "by" inside a name must not be stripped
        assert_eq!(parse_authors("Toby Jones"), vec!["Toby Jones"]);
    }

    #[test]
    fn test_dedup_key_prefers_isbn13() {
        let e = entry("Title", "Author", Some("9780062941367"), Some("0062941364"));
        assert_eq!(e.dedup_key(), "9780062941367");
    }

    #[test]
    fn test_dedup_key_falls_back_to_isbn10() {
        let e = entry("Title", "Author", None, Some("0062941364"));
        assert_eq!(e.dedup_key(), "0062941364");
    }

    #[test]
    fn test_dedup_key_title_author_fallback() {
        let e = entry("The Night Watchman", "Louise Erdrich", None, None);
        assert_eq!(e.dedup_key(), "the night watchman|louise erdrich");

        // Empty-string ISBNs are treated as absent
        let e = entry("The Night Watchman", "Louise Erdrich", Some(""), Some(""));
        assert_eq!(e.dedup_key(), "the night watchman|louise erdrich");
    }
}
