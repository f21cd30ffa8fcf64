use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::bestsellers::{BestsellerEntry, BestsellerSource, SourceError};
use crate::catalog::{CatalogIndex, LibraryStore, StoreError};
use crate::config::{CollectionSync, LibrarySync};
use crate::matcher::TitleMatcher;
use crate::reconciler;

use super::types::{RunReport, UnitOutcome};

/// Drives one full sync run across all configured libraries.
pub struct SyncRunner {
    source: Arc<dyn BestsellerSource>,
    store: Arc<dyn LibraryStore>,
    matcher: TitleMatcher,
    period: String,
}

impl SyncRunner {
    pub fn new(
        source: Arc<dyn BestsellerSource>,
        store: Arc<dyn LibraryStore>,
        matcher: TitleMatcher,
        period: impl Into<String>,
    ) -> Self {
        Self {
            source,
            store,
            matcher,
            period: period.into(),
        }
    }

    /// Sync every (library, collection) unit. Never returns early: a
    /// failed unit is recorded in the report and the rest still run.
    pub async fn run(&self, libraries: &[LibrarySync]) -> RunReport {
        let mut report = RunReport::default();

        for library in libraries {
            let (library_id, index) = match self.load_catalog(&library.name) {
                Ok(loaded) => loaded,
                Err(e) => {
                    error!(library = %library.name, "Skipping library: {e}");
                    for unit in &library.collections {
                        report.units.push(UnitOutcome::failed(
                            &library.name,
                            &unit.name,
                            &unit.lists,
                            e.to_string(),
                        ));
                    }
                    continue;
                }
            };

            info!(
                library = %library.name,
                items = index.len(),
                "Loaded catalog"
            );

            for unit in &library.collections {
                let outcome = self
                    .run_unit(&library.name, &library_id, &index, unit)
                    .await;
                report.units.push(outcome);
            }
        }

        let failed = report.failed_units().count();
        if failed == 0 {
            info!(units = report.units.len(), "Sync run complete");
        } else {
            error!(
                units = report.units.len(),
                failed, "Sync run completed with failures"
            );
        }
        report
    }

    fn load_catalog(&self, library_name: &str) -> Result<(String, CatalogIndex), StoreError> {
        let library_id = self.store.library_id(library_name)?;
        let items = self.store.list_items(&library_id)?;
        Ok((library_id, CatalogIndex::build(items)))
    }

    async fn run_unit(
        &self,
        library_name: &str,
        library_id: &str,
        index: &CatalogIndex,
        unit: &CollectionSync,
    ) -> UnitOutcome {
        let entries = match self.fetch_lists(&unit.lists).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(
                    library = %library_name,
                    collection = %unit.name,
                    "Skipping collection: {e}"
                );
                return UnitOutcome::failed(library_name, &unit.name, &unit.lists, e.to_string());
            }
        };

        let entries = dedupe_by_key(entries);

        let mut matched = 0usize;
        let mut unmatched = 0usize;
        let mut desired: HashSet<String> = HashSet::new();
        for entry in &entries {
            let result = self.matcher.resolve(entry, index);
            match result.item {
                Some(item) => {
                    matched += 1;
                    desired.insert(item.id);
                }
                None => {
                    unmatched += 1;
                    debug!(
                        title = %entry.title,
                        author = %entry.author,
                        list = %entry.list_name,
                        "No catalog match"
                    );
                }
            }
        }

        let collection = match self.store.collection(library_id, &unit.name) {
            Ok(collection) => collection,
            Err(e) => {
                error!(
                    library = %library_name,
                    collection = %unit.name,
                    "Cannot open collection: {e}"
                );
                return UnitOutcome::failed(library_name, &unit.name, &unit.lists, e.to_string());
            }
        };

        let result = reconciler::reconcile(self.store.as_ref(), &collection, &desired);
        info!(
            library = %library_name,
            collection = %unit.name,
            matched,
            unmatched,
            added = result.added.len(),
            removed = result.removed.len(),
            failures = result.failures.len(),
            "Synced collection"
        );

        UnitOutcome {
            library: library_name.to_string(),
            collection: unit.name.clone(),
            lists: unit.lists.clone(),
            matched,
            unmatched,
            reconcile: Some(result),
            error: None,
        }
    }

    /// Fetch all source lists of a unit concurrently. Any failed list
    /// fails the unit: reconciling against a partial union would strip
    /// the missing list's books from the collection.
    async fn fetch_lists(&self, lists: &[String]) -> Result<Vec<BestsellerEntry>, SourceError> {
        let fetches = lists.iter().map(|list| self.source.fetch(list, &self.period));
        let results = join_all(fetches).await;

        let mut entries = Vec::new();
        for result in results {
            entries.extend(result?);
        }
        Ok(entries)
    }
}

/// Collapse entries appearing on several lists, keeping the best rank.
/// Rank 0 means the provider omitted it and sorts worst, not best.
fn dedupe_by_key(entries: Vec<BestsellerEntry>) -> Vec<BestsellerEntry> {
    fn rank_order(rank: u32) -> u32 {
        if rank == 0 {
            u32::MAX
        } else {
            rank
        }
    }

    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, BestsellerEntry> = HashMap::new();

    for entry in entries {
        let key = entry.dedup_key();
        match by_key.get_mut(&key) {
            Some(existing) => {
                if rank_order(entry.rank) < rank_order(existing.rank) {
                    *existing = entry;
                }
            }
            None => {
                order.push(key.clone());
                by_key.insert(key, entry);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect()
}
