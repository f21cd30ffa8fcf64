use std::collections::HashSet;

/// One item (book or audiobook) of a library's catalog.
///
/// Loaded read-only each run. The id is owned by the store; the sync
/// never mutates items, only collection membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    /// Author names joined with ", ". Empty when unknown.
    pub author: String,
    /// Normalized ISBNs attached to this item.
    pub isbns: HashSet<String>,
    pub library_id: String,
}

/// Snapshot of a collection's membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    /// Store-owned collection id.
    pub id: String,
    pub name: String,
    pub library_id: String,
    pub member_item_ids: HashSet<String>,
}
