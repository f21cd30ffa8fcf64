//! Tiered entry-to-item resolution.

use tracing::debug;

use crate::bestsellers::BestsellerEntry;
use crate::catalog::{CatalogIndex, CatalogItem};

use super::scorer::{SimilarityScorer, TokenSetScorer};
use super::types::{MatchConfidence, MatchPolicy, MatchResult};

/// Resolves bestseller entries to catalog items.
pub struct TitleMatcher {
    policy: MatchPolicy,
    scorer: Box<dyn SimilarityScorer>,
}

impl TitleMatcher {
    /// Create a matcher with the default token-set scorer.
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            scorer: Box::new(TokenSetScorer::new()),
        }
    }

    /// Replace the similarity scorer.
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Resolve one entry against the index. Never fails: an entry that
    /// cannot be matched confidently comes back as NoMatch.
    pub fn resolve(&self, entry: &BestsellerEntry, index: &CatalogIndex) -> MatchResult {
        // Tier 1: exact ISBN
        for isbn in [&entry.isbn_13, &entry.isbn_10].into_iter().flatten() {
            if let Some(item) = index.lookup_by_isbn(isbn) {
                return self.result(entry, Some(item.clone()), MatchConfidence::Exact, None);
            }
        }

        // Tier 2: normalized title + author, unambiguous hit only
        let candidates = index.lookup_by_title_author(&entry.title, &entry.author);
        if candidates.len() == 1 {
            let item = candidates[0].clone();
            return self.result(entry, Some(item), MatchConfidence::Normalized, None);
        }

        // Tier 3: fuzzy over same-title candidates, author dropped from the key
        let candidates = index.lookup_by_title(&entry.title);
        if candidates.is_empty() {
            return self.result(entry, None, MatchConfidence::NoMatch, None);
        }

        let mut scored: Vec<(f32, &CatalogItem)> = candidates
            .into_iter()
            .map(|item| (self.score_candidate(entry, item), item))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let (best_score, best_item) = scored[0];
        if best_score < self.policy.fuzzy_threshold {
            debug!(
                "No fuzzy match for '{}': best score {:.2} below threshold {:.2}",
                entry.title, best_score, self.policy.fuzzy_threshold
            );
            return self.result(entry, None, MatchConfidence::NoMatch, None);
        }

        // Tie-break: a close runner-up means the choice is ambiguous
        if let Some((runner_up, _)) = scored.get(1) {
            if best_score - runner_up <= self.policy.tie_margin {
                debug!(
                    "Fuzzy tie for '{}': {:.2} vs {:.2}, refusing to pick",
                    entry.title, best_score, runner_up
                );
                return self.result(entry, None, MatchConfidence::NoMatch, None);
            }
        }

        self.result(
            entry,
            Some(best_item.clone()),
            MatchConfidence::Fuzzy,
            Some(best_score),
        )
    }

    /// Blend title and author similarity. Entries without an author
    /// credit are scored on title alone.
    fn score_candidate(&self, entry: &BestsellerEntry, item: &CatalogItem) -> f32 {
        let title_sim = self.scorer.score(&entry.title, &item.title);
        if entry.author.is_empty() || item.author.is_empty() {
            return title_sim;
        }

        let author_sim = self.scorer.score(&entry.author, &item.author);
        let total_weight = self.policy.title_weight + self.policy.author_weight;
        (title_sim * self.policy.title_weight + author_sim * self.policy.author_weight)
            / total_weight
    }

    fn result(
        &self,
        entry: &BestsellerEntry,
        item: Option<CatalogItem>,
        confidence: MatchConfidence,
        score: Option<f32>,
    ) -> MatchResult {
        debug_assert_eq!(item.is_some(), confidence != MatchConfidence::NoMatch);
        MatchResult {
            entry: entry.clone(),
            item,
            confidence,
            score,
        }
    }
}
