use crate::bestsellers::BestsellerEntry;
use crate::catalog::CatalogItem;

/// How a match was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchConfidence {
    /// ISBN found directly in the catalog.
    Exact,
    /// Normalized (title, author) key yielded exactly one item.
    Normalized,
    /// Accepted by similarity scoring above the threshold.
    Fuzzy,
    /// No acceptable candidate.
    NoMatch,
}

/// Outcome of resolving one entry against the catalog index.
///
/// `item` is present iff `confidence != NoMatch`.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub entry: BestsellerEntry,
    pub item: Option<CatalogItem>,
    pub confidence: MatchConfidence,
    /// Similarity score, only set for fuzzy matches.
    pub score: Option<f32>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.confidence != MatchConfidence::NoMatch
    }
}

/// Tunables for the fuzzy tier.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    /// Minimum blended score to accept a fuzzy candidate.
    pub fuzzy_threshold: f32,
    /// A runner-up within this margin of the best candidate makes the
    /// result ambiguous, which resolves to NoMatch.
    pub tie_margin: f32,
    /// Weight of title similarity in the blended score.
    pub title_weight: f32,
    /// Weight of author similarity in the blended score.
    pub author_weight: f32,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.85,
            tie_margin: 0.05,
            title_weight: 0.7,
            author_weight: 0.3,
        }
    }
}
