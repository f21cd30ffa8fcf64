pub mod bestsellers;
pub mod catalog;
pub mod config;
pub mod matcher;
pub mod reconciler;
pub mod runner;
pub mod testing;

pub use bestsellers::{BestsellerEntry, BestsellerSource, NytClient, NytConfig, SourceError};
pub use catalog::{
    CatalogIndex, CatalogItem, CollectionState, LibraryStore, SqliteLibraryStore, StoreError,
};
pub use config::{load_config, validate_config, Config, ConfigError};
pub use matcher::{MatchConfidence, MatchPolicy, MatchResult, TitleMatcher};
pub use reconciler::{ReconcilePlan, ReconcileResult};
pub use runner::{RunReport, SyncRunner, UnitOutcome};
