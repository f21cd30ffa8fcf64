//! String similarity scoring.

use std::collections::HashSet;

/// Swappable similarity policy. Implementations return a score in
/// [0.0, 1.0] where 1.0 means the strings describe the same thing.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f32;
}

/// Token-set scorer with small-edit-distance tolerance.
///
/// Scores by keyword overlap after stop-word removal:
/// - exact token match counts 1.0
/// - substring token match counts 0.5
/// - small-edit-distance token match counts 0.8 (catches spelling
///   variants like Erdrich/Erdrick)
///
/// The total is normalized by the larger keyword set so the score is
/// symmetric and extra tokens on either side lower it.
#[derive(Debug, Default)]
pub struct TokenSetScorer;

impl TokenSetScorer {
    pub fn new() -> Self {
        Self
    }

    /// Extract keywords from text for matching.
    fn extract_keywords(text: &str) -> HashSet<String> {
        let stop_words: HashSet<&str> = [
            "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
            "by", "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had",
        ]
        .into_iter()
        .collect();

        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .map(|s| s.trim().to_string())
            .filter(|s| s.len() > 1)
            .filter(|s| !stop_words.contains(s.as_str()))
            .collect()
    }

    /// Check if two tokens are fuzzy matches (small edit distance).
    fn is_fuzzy_token_match(a: &str, b: &str) -> bool {
        let len_diff = (a.len() as i32 - b.len() as i32).abs();
        if len_diff > 2 {
            return false;
        }

        // Short words produce too many false positives
        if a.len() < 4 || b.len() < 4 {
            return false;
        }

        let distance = Self::levenshtein_distance(a, b);
        let threshold = if a.len() >= 8 { 2 } else { 1 };
        distance <= threshold
    }

    /// Calculate Levenshtein edit distance between two strings.
    fn levenshtein_distance(a: &str, b: &str) -> usize {
        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();
        let a_len = a_chars.len();
        let b_len = b_chars.len();

        if a_len == 0 {
            return b_len;
        }
        if b_len == 0 {
            return a_len;
        }

        let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

        for (i, row) in matrix.iter_mut().enumerate().take(a_len + 1) {
            row[0] = i;
        }
        for (j, val) in matrix[0].iter_mut().enumerate().take(b_len + 1) {
            *val = j;
        }

        for (i, a_char) in a_chars.iter().enumerate() {
            for (j, b_char) in b_chars.iter().enumerate() {
                let cost = if *a_char == *b_char { 0 } else { 1 };
                matrix[i + 1][j + 1] = (matrix[i][j + 1] + 1)
                    .min(matrix[i + 1][j] + 1)
                    .min(matrix[i][j] + cost);
            }
        }

        matrix[a_len][b_len]
    }
}

impl SimilarityScorer for TokenSetScorer {
    fn score(&self, a: &str, b: &str) -> f32 {
        let a_keywords = Self::extract_keywords(a);
        let b_keywords = Self::extract_keywords(b);

        if a_keywords.is_empty() && b_keywords.is_empty() {
            return 1.0;
        }
        if a_keywords.is_empty() || b_keywords.is_empty() {
            return 0.0;
        }

        let mut total = 0.0f32;
        for kw in &a_keywords {
            if b_keywords.contains(kw) {
                total += 1.0;
            } else if b_keywords
                .iter()
                .any(|bk| bk.contains(kw.as_str()) || kw.contains(bk.as_str()))
            {
                total += 0.5;
            } else if b_keywords.iter().any(|bk| Self::is_fuzzy_token_match(kw, bk)) {
                total += 0.8;
            }
        }

        let max_len = a_keywords.len().max(b_keywords.len()) as f32;
        (total / max_len).min(1.0)
    }
}
