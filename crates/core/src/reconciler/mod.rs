//! Collection reconciler.
//!
//! Computes the set difference between the current members of a
//! collection and the desired members, then applies only those
//! mutations. Removals run before additions. Each mutation fails
//! independently: one bad row never aborts the rest of the plan.

mod sync;
mod types;

pub use sync::{plan, reconcile};
pub use types::{MutationFailure, ReconcilePlan, ReconcileResult};
