use std::collections::HashSet;

use crate::bestsellers::BestsellerEntry;
use crate::catalog::CatalogItem;

/// A bestseller entry with sensible defaults for tests.
pub fn entry(title: &str, author: &str, rank: u32) -> BestsellerEntry {
    BestsellerEntry {
        title: title.to_string(),
        author: author.to_string(),
        isbn_10: None,
        isbn_13: None,
        rank,
        list_name: "hardcover-fiction".to_string(),
    }
}

/// A catalog item with sensible defaults for tests.
pub fn item(id: &str, title: &str, author: &str, library_id: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        isbns: HashSet::new(),
        library_id: library_id.to_string(),
    }
}
