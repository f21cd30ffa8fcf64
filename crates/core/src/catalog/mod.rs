//! Catalog and collection store.
//!
//! Read side: enumerate a library's items and build the [`CatalogIndex`]
//! the matcher resolves against. Write side: single-item add/remove
//! mutations on collection membership. The only real implementation
//! reads the Audiobookshelf sqlite database directly.

mod index;
pub mod normalize;
mod sqlite;
mod types;

pub use index::CatalogIndex;
pub use sqlite::SqliteLibraryStore;
pub use types::*;

use thiserror::Error;

/// Errors from the catalog/collection store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The configured library does not exist. Fatal for every unit
    /// targeting that library.
    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    /// The database stayed busy/locked past the configured timeout.
    #[error("Store operation timed out: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Trait for the catalog/collection store.
pub trait LibraryStore: Send + Sync {
    /// Resolve a library name to its id.
    fn library_id(&self, name: &str) -> Result<String, StoreError>;

    /// Enumerate all items of a library.
    fn list_items(&self, library_id: &str) -> Result<Vec<CatalogItem>, StoreError>;

    /// Get a collection's current membership, creating the collection
    /// if it does not exist yet.
    fn collection(&self, library_id: &str, name: &str) -> Result<CollectionState, StoreError>;

    /// Add a single item to a collection.
    fn add_member(&self, collection_id: &str, item_id: &str) -> Result<(), StoreError>;

    /// Remove a single item from a collection.
    fn remove_member(&self, collection_id: &str, item_id: &str) -> Result<(), StoreError>;
}
