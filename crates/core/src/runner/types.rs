use crate::reconciler::ReconcileResult;

/// Outcome of syncing one (library, collection) unit.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    pub library: String,
    pub collection: String,
    /// Source lists feeding this collection.
    pub lists: Vec<String>,
    /// Entries resolved to a catalog item.
    pub matched: usize,
    /// Entries with no acceptable catalog item.
    pub unmatched: usize,
    /// Mutations applied, absent when the unit failed before reconciling.
    pub reconcile: Option<ReconcileResult>,
    /// Set when the unit failed as a whole.
    pub error: Option<String>,
}

impl UnitOutcome {
    /// Whether the unit ran to completion. Individual mutation failures
    /// inside [`ReconcileResult::failures`] do not fail the unit; the
    /// next run retries them.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub(crate) fn failed(
        library: &str,
        collection: &str,
        lists: &[String],
        error: String,
    ) -> Self {
        Self {
            library: library.to_string(),
            collection: collection.to_string(),
            lists: lists.to_vec(),
            matched: 0,
            unmatched: 0,
            reconcile: None,
            error: Some(error),
        }
    }
}

/// Summary of a full sync run, one outcome per configured unit.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub units: Vec<UnitOutcome>,
}

impl RunReport {
    /// True when every unit ran to completion.
    pub fn is_success(&self) -> bool {
        self.units.iter().all(UnitOutcome::is_success)
    }

    pub fn failed_units(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.units.iter().filter(|u| !u.is_success())
    }
}
