//! In-memory lookup index over one library's catalog.

use std::collections::HashMap;

use super::normalize::{normalize_isbn, normalize_title, title_author_key};
use super::types::CatalogItem;

/// Lookup structures over a library's items, built once per run and
/// shared read-only by every collection synced into that library.
#[derive(Debug)]
pub struct CatalogIndex {
    items: Vec<CatalogItem>,
    by_isbn: HashMap<String, usize>,
    by_title_author: HashMap<String, Vec<usize>>,
    by_title: HashMap<String, Vec<usize>>,
}

impl CatalogIndex {
    /// Build the index from a library's items.
    pub fn build(items: Vec<CatalogItem>) -> Self {
        let mut by_isbn = HashMap::new();
        let mut by_title_author: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_title: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, item) in items.iter().enumerate() {
            for isbn in &item.isbns {
                let key = normalize_isbn(isbn);
                if !key.is_empty() {
                    // First item wins when two share an ISBN
                    by_isbn.entry(key).or_insert(idx);
                }
            }

            let title_key = normalize_title(&item.title);
            if !title_key.is_empty() {
                by_title_author
                    .entry(title_author_key(&item.title, &item.author))
                    .or_default()
                    .push(idx);
                by_title.entry(title_key).or_default().push(idx);
            }
        }

        Self {
            items,
            by_isbn,
            by_title_author,
            by_title,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by ISBN. The given ISBN may carry hyphens.
    pub fn lookup_by_isbn(&self, isbn: &str) -> Option<&CatalogItem> {
        let key = normalize_isbn(isbn);
        if key.is_empty() {
            return None;
        }
        self.by_isbn.get(&key).map(|&idx| &self.items[idx])
    }

    /// Look up items by normalized (title, author) key.
    pub fn lookup_by_title_author(&self, title: &str, author: &str) -> Vec<&CatalogItem> {
        self.by_title_author
            .get(&title_author_key(title, author))
            .map(|idxs| idxs.iter().map(|&i| &self.items[i]).collect())
            .unwrap_or_default()
    }

    /// Look up items by normalized title alone.
    pub fn lookup_by_title(&self, title: &str) -> Vec<&CatalogItem> {
        self.by_title
            .get(&normalize_title(title))
            .map(|idxs| idxs.iter().map(|&i| &self.items[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn item(id: &str, title: &str, author: &str, isbns: &[&str]) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            isbns: isbns.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            library_id: "lib-1".to_string(),
        }
    }

    fn sample_index() -> CatalogIndex {
        CatalogIndex::build(vec![
            item(
                "a",
                "the night watchman",
                "louise erdrich",
                &["9780062671189"],
            ),
            item("b", "Educated: A Memoir", "Tara Westover", &["9780399590504"]),
            item("c", "Educated", "Someone Else", &[]),
        ])
    }

    #[test]
    fn test_lookup_by_isbn() {
        let index = sample_index();
        assert_eq!(index.lookup_by_isbn("9780062671189").unwrap().id, "a");
        // Hyphenated form hits the same key
        assert_eq!(index.lookup_by_isbn("978-0-06-267118-9").unwrap().id, "a");
        assert!(index.lookup_by_isbn("9999999999999").is_none());
        assert!(index.lookup_by_isbn("").is_none());
    }

    #[test]
    fn test_lookup_by_title_author_normalizes() {
        let index = sample_index();
        let found = index.lookup_by_title_author("The Night Watchman", "Louise Erdrich");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
    }

    #[test]
    fn test_lookup_by_title_ignores_subtitle_and_author() {
        let index = sample_index();
        let found = index.lookup_by_title("Educated");
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_lookup_miss() {
        let index = sample_index();
        assert!(index.lookup_by_title("Nonexistent").is_empty());
        assert!(index
            .lookup_by_title_author("Educated", "Nobody")
            .is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = CatalogIndex::build(vec![]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_duplicate_isbn_first_wins() {
        let index = CatalogIndex::build(vec![
            item("print", "Some Book", "A", &["9780000000001"]),
            item("audio", "Some Book (audio)", "A", &["9780000000001"]),
        ]);
        assert_eq!(index.lookup_by_isbn("9780000000001").unwrap().id, "print");
    }
}
