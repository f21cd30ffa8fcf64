use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub source: SourceConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub matcher: MatcherSettings,
    /// Libraries to sync, each with its collection -> list mapping.
    pub libraries: Vec<LibrarySync>,
}

/// Bestseller source (NYT Books API) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// NYT Books API key
    pub api_key: String,
    /// Override the API base URL (useful for testing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// List period: "current" for the latest lists, or a YYYY-MM-DD date
    #[serde(default = "default_period")]
    pub period: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u32,
}

fn default_period() -> String {
    "current".to_string()
}

fn default_source_timeout() -> u32 {
    30
}

/// Catalog/collection store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path to the Audiobookshelf sqlite database
    pub path: PathBuf,
    /// Sqlite busy timeout in milliseconds (default: 5000)
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u32,
}

fn default_busy_timeout() -> u32 {
    5000
}

/// Title matcher tunables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatcherSettings {
    /// Minimum similarity score for a fuzzy match (default: 0.85)
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f32,
    /// Two candidates within this margin of each other is a tie,
    /// and a tie resolves to no match (default: 0.05)
    #[serde(default = "default_tie_margin")]
    pub tie_margin: f32,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            tie_margin: default_tie_margin(),
        }
    }
}

fn default_fuzzy_threshold() -> f32 {
    0.85
}

fn default_tie_margin() -> f32 {
    0.05
}

/// One library's sync configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySync {
    /// Library name as it appears in Audiobookshelf. Must already exist.
    pub name: String,
    pub collections: Vec<CollectionSync>,
}

/// One destination collection and the lists that feed it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionSync {
    /// Collection name, created on first sync if missing.
    pub name: String,
    /// NYT encoded list names, e.g. "hardcover-fiction".
    pub lists: Vec<String>,
}
