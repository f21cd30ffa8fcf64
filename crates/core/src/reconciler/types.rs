use crate::catalog::StoreError;

/// Minimal set of mutations that turns the current membership into the
/// desired one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Item ids to add, sorted for deterministic application order.
    pub to_add: Vec<String>,
    /// Item ids to remove, sorted for deterministic application order.
    pub to_remove: Vec<String>,
    /// Item ids already in place.
    pub unchanged: Vec<String>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn mutation_count(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// A single membership mutation that failed. The rest of the plan keeps
/// going.
#[derive(Debug, Clone)]
pub struct MutationFailure {
    pub item_id: String,
    pub cause: StoreError,
}

/// What actually happened when a plan was applied.
#[derive(Debug, Clone, Default)]
pub struct ReconcileResult {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
    pub failures: Vec<MutationFailure>,
}

impl ReconcileResult {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn mutation_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}
