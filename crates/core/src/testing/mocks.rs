use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::bestsellers::{BestsellerEntry, BestsellerSource, SourceError};
use crate::catalog::{CatalogItem, CollectionState, LibraryStore, StoreError};

/// In-memory bestseller source. Lists are seeded up front; errors can
/// be injected per list.
#[derive(Default)]
pub struct MockBestsellerSource {
    lists: Mutex<HashMap<String, Vec<BestsellerEntry>>>,
    errors: Mutex<HashMap<String, SourceError>>,
    fetches: Mutex<Vec<(String, String)>>,
}

impl MockBestsellerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed entries for a list name.
    pub fn add_list(&self, list_name: &str, entries: Vec<BestsellerEntry>) {
        self.lists
            .lock()
            .unwrap()
            .insert(list_name.to_string(), entries);
    }

    /// Make every fetch of this list fail with the given error.
    pub fn fail_list(&self, list_name: &str, error: SourceError) {
        self.errors
            .lock()
            .unwrap()
            .insert(list_name.to_string(), error);
    }

    /// All (list_name, period) pairs fetched so far.
    pub fn recorded_fetches(&self) -> Vec<(String, String)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BestsellerSource for MockBestsellerSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        list_name: &str,
        period: &str,
    ) -> Result<Vec<BestsellerEntry>, SourceError> {
        self.fetches
            .lock()
            .unwrap()
            .push((list_name.to_string(), period.to_string()));

        if let Some(error) = self.errors.lock().unwrap().get(list_name) {
            return Err(error.clone());
        }

        self.lists
            .lock()
            .unwrap()
            .get(list_name)
            .cloned()
            .ok_or_else(|| SourceError::InvalidListName(list_name.to_string()))
    }
}

#[derive(Default)]
struct MockStoreState {
    /// library name -> library id
    libraries: HashMap<String, String>,
    /// library id -> items
    items: HashMap<String, Vec<CatalogItem>>,
    /// (library id, collection name) -> collection
    collections: HashMap<(String, String), CollectionState>,
    /// item ids whose membership mutations fail
    failing_items: HashSet<String>,
    /// "add <collection> <item>" / "remove <collection> <item>"
    mutations: Vec<String>,
    next_collection_id: u32,
}

/// In-memory library store. Collections are created on demand like the
/// real store; individual mutations can be made to fail by item id.
#[derive(Default)]
pub struct MockLibraryStore {
    state: Mutex<MockStoreState>,
}

impl MockLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_library(&self, name: &str, id: &str) {
        self.state
            .lock()
            .unwrap()
            .libraries
            .insert(name.to_string(), id.to_string());
    }

    pub fn add_item(&self, item: CatalogItem) {
        let mut state = self.state.lock().unwrap();
        state
            .items
            .entry(item.library_id.clone())
            .or_default()
            .push(item);
    }

    /// Make add/remove of this item id fail with a database error.
    pub fn fail_mutation_for(&self, item_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_items
            .insert(item_id.to_string());
    }

    /// All membership mutations applied so far, in order, formatted as
    /// "add <collection_id> <item_id>" or "remove <collection_id> <item_id>".
    pub fn recorded_mutations(&self) -> Vec<String> {
        self.state.lock().unwrap().mutations.clone()
    }

    /// Current member ids of a collection, empty if it was never created.
    pub fn members(&self, library_id: &str, name: &str) -> HashSet<String> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .get(&(library_id.to_string(), name.to_string()))
            .map(|c| c.member_item_ids.clone())
            .unwrap_or_default()
    }

    fn check_failing(state: &MockStoreState, item_id: &str) -> Result<(), StoreError> {
        if state.failing_items.contains(item_id) {
            return Err(StoreError::Database(format!(
                "injected failure for {item_id}"
            )));
        }
        Ok(())
    }
}

impl LibraryStore for MockLibraryStore {
    fn library_id(&self, name: &str) -> Result<String, StoreError> {
        self.state
            .lock()
            .unwrap()
            .libraries
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::LibraryNotFound(name.to_string()))
    }

    fn list_items(&self, library_id: &str) -> Result<Vec<CatalogItem>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .items
            .get(library_id)
            .cloned()
            .unwrap_or_default())
    }

    fn collection(&self, library_id: &str, name: &str) -> Result<CollectionState, StoreError> {
        let mut state = self.state.lock().unwrap();
        let key = (library_id.to_string(), name.to_string());
        if let Some(existing) = state.collections.get(&key) {
            return Ok(existing.clone());
        }

        state.next_collection_id += 1;
        let collection = CollectionState {
            id: format!("col-{}", state.next_collection_id),
            name: name.to_string(),
            library_id: library_id.to_string(),
            member_item_ids: HashSet::new(),
        };
        state.collections.insert(key, collection.clone());
        Ok(collection)
    }

    fn add_member(&self, collection_id: &str, item_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failing(&state, item_id)?;
        for collection in state.collections.values_mut() {
            if collection.id == collection_id {
                collection.member_item_ids.insert(item_id.to_string());
            }
        }
        state.mutations.push(format!("add {collection_id} {item_id}"));
        Ok(())
    }

    fn remove_member(&self, collection_id: &str, item_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failing(&state, item_id)?;
        for collection in state.collections.values_mut() {
            if collection.id == collection_id {
                collection.member_item_ids.remove(item_id);
            }
        }
        state
            .mutations
            .push(format!("remove {collection_id} {item_id}"));
        Ok(())
    }
}
