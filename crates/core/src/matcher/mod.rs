//! Title matcher.
//!
//! Resolves a bestseller-list entry to at most one catalog item using a
//! tiered strategy: exact ISBN, then normalized title+author, then
//! fuzzy scoring over same-title candidates. A near-tie between fuzzy
//! candidates resolves to no match rather than putting the wrong
//! edition in a collection.

mod resolve;
mod scorer;
mod types;

pub use resolve::TitleMatcher;
pub use scorer::{SimilarityScorer, TokenSetScorer};
pub use types::*;
