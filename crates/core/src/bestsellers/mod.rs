//! Bestseller list source adapter.
//!
//! Fetches named bestseller lists (e.g. "hardcover-fiction") from an
//! external provider. The only real implementation talks to the NYT
//! Books API; tests use the mock in [`crate::testing`].

mod nyt;
mod types;

pub use nyt::{NytClient, NytConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching bestseller lists.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Provider unreachable or returned a server error.
    #[error("Bestseller source unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout.
    #[error("Request to bestseller source timed out")]
    Timeout,

    /// The provider does not know this list name.
    #[error("Unknown bestseller list: {0}")]
    InvalidListName(String),

    /// Rate limit exceeded, please wait before retrying.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// Client not configured (missing or rejected API key).
    #[error("Source client not configured: {0}")]
    NotConfigured(String),

    /// Failed to parse response.
    #[error("Failed to parse source response: {0}")]
    Parse(String),
}

/// Trait for bestseller list providers.
#[async_trait]
pub trait BestsellerSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch one named list for the given period.
    ///
    /// `period` is either "current" for the latest published lists or a
    /// YYYY-MM-DD date. Entries come back in rank order. Records with
    /// missing author or ISBN fields are kept with those fields empty,
    /// never dropped and never a fetch failure.
    async fn fetch(&self, list_name: &str, period: &str)
        -> Result<Vec<BestsellerEntry>, SourceError>;
}
