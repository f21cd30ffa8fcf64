use std::collections::HashSet;

use tracing::{debug, warn};

use crate::catalog::{CollectionState, LibraryStore};

use super::types::{MutationFailure, ReconcilePlan, ReconcileResult};

/// Compute the minimal mutation set turning `current` into `desired`.
///
/// Pure set difference. Output vectors are sorted so repeated runs over
/// the same inputs produce the same plan.
pub fn plan(current: &HashSet<String>, desired: &HashSet<String>) -> ReconcilePlan {
    let mut to_add: Vec<String> = desired.difference(current).cloned().collect();
    let mut to_remove: Vec<String> = current.difference(desired).cloned().collect();
    let mut unchanged: Vec<String> = current.intersection(desired).cloned().collect();

    to_add.sort();
    to_remove.sort();
    unchanged.sort();

    ReconcilePlan {
        to_add,
        to_remove,
        unchanged,
    }
}

/// Apply the plan for `desired` against the collection's current state.
///
/// Removals first, so the collection never transiently holds stale
/// members alongside fresh ones. A failed mutation is recorded and the
/// remaining mutations still run.
pub fn reconcile(
    store: &dyn LibraryStore,
    collection: &CollectionState,
    desired: &HashSet<String>,
) -> ReconcileResult {
    let plan = plan(&collection.member_item_ids, desired);
    if plan.is_noop() {
        debug!(
            collection = %collection.name,
            members = plan.unchanged.len(),
            "Collection already in sync"
        );
        return ReconcileResult {
            unchanged: plan.unchanged,
            ..Default::default()
        };
    }

    debug!(
        collection = %collection.name,
        add = plan.to_add.len(),
        remove = plan.to_remove.len(),
        "Applying reconcile plan"
    );

    let mut result = ReconcileResult {
        unchanged: plan.unchanged,
        ..Default::default()
    };

    for item_id in plan.to_remove {
        match store.remove_member(&collection.id, &item_id) {
            Ok(()) => result.removed.push(item_id),
            Err(e) => {
                warn!(
                    collection = %collection.name,
                    item = %item_id,
                    "Failed to remove member: {e}"
                );
                result.failures.push(MutationFailure { item_id, cause: e });
            }
        }
    }

    for item_id in plan.to_add {
        match store.add_member(&collection.id, &item_id) {
            Ok(()) => result.added.push(item_id),
            Err(e) => {
                warn!(
                    collection = %collection.name,
                    item = %item_id,
                    "Failed to add member: {e}"
                );
                result.failures.push(MutationFailure { item_id, cause: e });
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLibraryStore;

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn state(members: &[&str]) -> CollectionState {
        CollectionState {
            id: "col-1".to_string(),
            name: "NYT Hardcover Fiction".to_string(),
            library_id: "lib-1".to_string(),
            member_item_ids: ids(members),
        }
    }

    #[test]
    fn test_plan_minimal_mutations() {
        let plan = plan(&ids(&["a", "b", "c"]), &ids(&["b", "c", "d"]));
        assert_eq!(plan.to_add, vec!["d"]);
        assert_eq!(plan.to_remove, vec!["a"]);
        assert_eq!(plan.unchanged, vec!["b", "c"]);
        assert_eq!(plan.mutation_count(), 2);
    }

    #[test]
    fn test_plan_equal_sets_is_noop() {
        let plan = plan(&ids(&["a", "b"]), &ids(&["a", "b"]));
        assert!(plan.is_noop());
        assert_eq!(plan.unchanged, vec!["a", "b"]);
    }

    #[test]
    fn test_plan_empty_desired_removes_all() {
        let plan = plan(&ids(&["a", "b"]), &HashSet::new());
        assert_eq!(plan.to_remove, vec!["a", "b"]);
        assert!(plan.to_add.is_empty());
    }

    #[test]
    fn test_plan_is_deterministic() {
        let current = ids(&["z", "m", "a"]);
        let desired = ids(&["q", "b", "x"]);
        assert_eq!(plan(&current, &desired), plan(&current, &desired));
        assert_eq!(plan(&current, &desired).to_add, vec!["b", "q", "x"]);
    }

    #[test]
    fn test_reconcile_applies_plan() {
        let store = MockLibraryStore::new();
        let result = reconcile(&store, &state(&["a", "b", "c"]), &ids(&["b", "c", "d"]));

        assert_eq!(result.added, vec!["d"]);
        assert_eq!(result.removed, vec!["a"]);
        assert_eq!(result.unchanged, vec!["b", "c"]);
        assert!(result.is_clean());

        // Removals must be recorded before additions
        let mutations = store.recorded_mutations();
        assert_eq!(mutations, vec!["remove col-1 a", "add col-1 d"]);
    }

    #[test]
    fn test_reconcile_in_sync_touches_nothing() {
        let store = MockLibraryStore::new();
        let result = reconcile(&store, &state(&["a", "b"]), &ids(&["a", "b"]));

        assert_eq!(result.mutation_count(), 0);
        assert!(store.recorded_mutations().is_empty());
    }

    #[test]
    fn test_reconcile_failure_does_not_stop_plan() {
        let store = MockLibraryStore::new();
        store.fail_mutation_for("b");

        let result = reconcile(&store, &state(&["a", "b"]), &ids(&["c", "d"]));

        // "b" removal fails, everything else still happens
        assert_eq!(result.removed, vec!["a"]);
        assert_eq!(result.added, vec!["c", "d"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].item_id, "b");
        assert!(!result.is_clean());
    }
}
