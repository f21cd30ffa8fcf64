//! Library store over the Audiobookshelf sqlite database.
//!
//! Reads the schema Audiobookshelf owns (libraries, books, authors,
//! bookAuthors, libraryItems) and writes only to collections and
//! collectionBooks. The database must already exist; [`Self::in_memory`]
//! creates the relevant schema subset for tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use super::normalize::normalize_isbn;
use super::{CatalogItem, CollectionState, LibraryStore, StoreError};

/// Sqlite-backed library store.
pub struct SqliteLibraryStore {
    conn: Mutex<Connection>,
}

impl SqliteLibraryStore {
    /// Open an existing Audiobookshelf database.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::Database(format!(
                "database file not found: {}",
                path.display()
            )));
        }
        let conn = Connection::open(path).map_err(map_sqlite_error)?;
        Self::configure(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store with the Audiobookshelf schema subset
    /// this crate touches (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(map_sqlite_error)?;
        Self::configure(&conn, 5000)?;
        conn.execute_batch(
            r#"
            CREATE TABLE libraries (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE books (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                isbn TEXT
            );

            CREATE TABLE authors (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE bookAuthors (
                id TEXT PRIMARY KEY,
                bookId TEXT NOT NULL REFERENCES books(id),
                authorId TEXT NOT NULL REFERENCES authors(id)
            );

            CREATE TABLE libraryItems (
                id TEXT PRIMARY KEY,
                mediaId TEXT NOT NULL,
                libraryId TEXT NOT NULL REFERENCES libraries(id)
            );

            CREATE TABLE collections (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                createdAt TEXT NOT NULL,
                updatedAt TEXT NOT NULL,
                libraryId TEXT NOT NULL REFERENCES libraries(id)
            );

            CREATE TABLE collectionBooks (
                id TEXT PRIMARY KEY,
                "order" INTEGER NOT NULL,
                createdAt TEXT NOT NULL,
                bookId TEXT NOT NULL,
                collectionId TEXT NOT NULL REFERENCES collections(id)
            );
            "#,
        )
        .map_err(map_sqlite_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn configure(conn: &Connection, busy_timeout_ms: u32) -> Result<(), StoreError> {
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            busy_timeout_ms
        ))
        .map_err(map_sqlite_error)
    }
}

impl LibraryStore for SqliteLibraryStore {
    fn library_id(&self, name: &str) -> Result<String, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id FROM libraries WHERE name = ? LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()
        .map_err(map_sqlite_error)?
        .ok_or_else(|| StoreError::LibraryNotFound(name.to_string()))
    }

    fn list_items(&self, library_id: &str) -> Result<Vec<CatalogItem>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                r#"
                SELECT b.id,
                       b.title,
                       COALESCE(GROUP_CONCAT(a.name, ', '), ''),
                       COALESCE(b.isbn, '')
                FROM books b
                JOIN libraryItems li ON li.mediaId = b.id
                LEFT JOIN bookAuthors ba ON ba.bookId = b.id
                LEFT JOIN authors a ON a.id = ba.authorId
                WHERE li.libraryId = ?
                GROUP BY b.id
                "#,
            )
            .map_err(map_sqlite_error)?;

        let rows = stmt
            .query_map(params![library_id], |row| {
                let id: String = row.get(0)?;
                let title: String = row.get(1)?;
                let author: String = row.get(2)?;
                let isbn: String = row.get(3)?;
                Ok((id, title, author, isbn))
            })
            .map_err(map_sqlite_error)?;

        let mut items = Vec::new();
        for row in rows {
            let (id, title, author, isbn) = row.map_err(map_sqlite_error)?;
            let mut isbns = HashSet::new();
            let normalized = normalize_isbn(&isbn);
            if !normalized.is_empty() {
                isbns.insert(normalized);
            }
            items.push(CatalogItem {
                id,
                title,
                author,
                isbns,
                library_id: library_id.to_string(),
            });
        }

        debug!("Loaded {} items for library {}", items.len(), library_id);
        Ok(items)
    }

    fn collection(&self, library_id: &str, name: &str) -> Result<CollectionState, StoreError> {
        let conn = self.conn.lock().unwrap();
        let now = utc_now_sql();

        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM collections WHERE name = ? AND libraryId = ? LIMIT 1",
                params![name, library_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_sqlite_error)?;

        let collection_id = match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE collections SET updatedAt = ? WHERE id = ?",
                    params![now, id],
                )
                .map_err(map_sqlite_error)?;
                id
            }
            None => {
                let id = Uuid::new_v4().to_string();
                conn.execute(
                    "INSERT INTO collections (id, name, description, createdAt, updatedAt, libraryId)
                     VALUES (?, ?, NULL, ?, ?, ?)",
                    params![id, name, now, now, library_id],
                )
                .map_err(map_sqlite_error)?;
                debug!("Created collection '{}' in library {}", name, library_id);
                id
            }
        };

        let mut stmt = conn
            .prepare("SELECT bookId FROM collectionBooks WHERE collectionId = ?")
            .map_err(map_sqlite_error)?;
        let rows = stmt
            .query_map(params![collection_id], |row| row.get::<_, String>(0))
            .map_err(map_sqlite_error)?;

        let mut member_item_ids = HashSet::new();
        for row in rows {
            member_item_ids.insert(row.map_err(map_sqlite_error)?);
        }

        Ok(CollectionState {
            id: collection_id,
            name: name.to_string(),
            library_id: library_id.to_string(),
            member_item_ids,
        })
    }

    fn add_member(&self, collection_id: &str, item_id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO collectionBooks (id, "order", createdAt, bookId, collectionId)
            VALUES (
                ?,
                (SELECT COALESCE(MAX("order"), 0) + 1 FROM collectionBooks WHERE collectionId = ?2),
                ?,
                ?,
                ?2
            )
            "#,
            params![Uuid::new_v4().to_string(), collection_id, utc_now_sql(), item_id],
        )
        .map_err(map_sqlite_error)?;
        Ok(())
    }

    fn remove_member(&self, collection_id: &str, item_id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM collectionBooks WHERE collectionId = ? AND bookId = ?",
            params![collection_id, item_id],
        )
        .map_err(map_sqlite_error)?;
        Ok(())
    }
}

/// Timestamp in the format Audiobookshelf stores:
/// `2026-08-29 19:34:35.791 +00:00`.
fn utc_now_sql() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.3f +00:00").to_string()
}

fn map_sqlite_error(e: rusqlite::Error) -> StoreError {
    let msg = e.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("locked") || lower.contains("busy") {
        StoreError::Timeout(msg)
    } else {
        StoreError::Database(msg)
    }
}
