//! Run orchestrator.
//!
//! Drives one full sync: for every configured library, load the catalog
//! once, then for every collection fetch its source lists, match the
//! entries, and reconcile membership. Units are isolated: a failed
//! fetch or a missing library marks its own units failed and the run
//! moves on.

mod run;
mod types;

pub use run::SyncRunner;
pub use types::{RunReport, UnitOutcome};
