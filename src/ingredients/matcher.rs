use log::debug;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::model::MatchResult;

/// Minimum score to consider a fuzzy match
pub const MATCH_THRESHOLD: f64 = 70.0;

/// Whether `threshold` is a usable score cutoff (0-100, NaN excluded)
pub fn threshold_in_range(threshold: f64) -> bool {
    (0.0..=100.0).contains(&threshold)
}

/// Capability that scores how similar two strings are, from 0 to 100
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Token-set similarity.
///
/// Insensitive to word order and to one string's words being a subset of the
/// other's: `"garlic cloves"` vs `"garlic"` scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetScorer;

impl SimilarityScorer for TokenSetScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        token_set_ratio(a, b)
    }
}

/// Token-set ratio of two strings, 0 to 100
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side's words are a subset of the other's
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    // BTreeSet iteration is sorted, so these are already in canonical order
    let sect = intersection.join(" ");
    let ab = diff_ab.join(" ");
    let ba = diff_ba.join(" ");

    if sect.is_empty() {
        return ratio(&ab, &ba);
    }

    let sect_ab = format!("{} {}", sect, ab);
    let sect_ba = format!("{} {}", sect, ba);
    ratio(&sect_ab, &sect_ba)
        .max(ratio(&sect, &sect_ab))
        .max(ratio(&sect, &sect_ba))
}

/// Normalized Indel similarity, 0 to 100
fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let distance = total - 2 * longest_common_subsequence(&a, &b);
    100.0 * (1.0 - distance as f64 / total as f64)
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Decides whether an ingredient is already in the pantry.
///
/// Exact (case-insensitive, trimmed) matches win outright with a score of
/// 100. Otherwise the best fuzzy candidate is accepted when it reaches the
/// threshold. Ties keep the earliest pantry name.
#[derive(Clone)]
pub struct IngredientMatcher {
    scorer: Arc<dyn SimilarityScorer>,
    threshold: f64,
}

impl fmt::Debug for IngredientMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngredientMatcher")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Default for IngredientMatcher {
    fn default() -> Self {
        Self::new(Arc::new(TokenSetScorer))
    }
}

impl IngredientMatcher {
    pub fn new(scorer: Arc<dyn SimilarityScorer>) -> Self {
        Self {
            scorer,
            threshold: MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Match a single ingredient name against the pantry item names
    pub fn match_ingredient<S: AsRef<str>>(&self, name: &str, pantry_names: &[S]) -> MatchResult {
        let query = name.trim().to_lowercase();
        if query.is_empty() || pantry_names.is_empty() {
            return MatchResult::missing(name);
        }

        if let Some(exact) = pantry_names
            .iter()
            .map(|candidate| candidate.as_ref())
            .find(|candidate| candidate.trim().to_lowercase() == query)
        {
            return MatchResult {
                ingredient_name: name.to_string(),
                in_pantry: true,
                pantry_match: Some(exact.to_string()),
                score: 100.0,
            };
        }

        let mut best: Option<(&str, f64)> = None;
        for candidate in pantry_names.iter().map(|candidate| candidate.as_ref()) {
            let score = self.scorer.score(&query, &candidate.to_lowercase());
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) if score >= self.threshold => {
                debug!("{:?} matched {:?} with score {:.1}", name, candidate, score);
                MatchResult {
                    ingredient_name: name.to_string(),
                    in_pantry: true,
                    pantry_match: Some(candidate.to_string()),
                    score,
                }
            }
            _ => MatchResult::missing(name),
        }
    }

    /// Match every name against the same pantry snapshot, preserving order
    pub fn match_many<N: AsRef<str>, S: AsRef<str>>(
        &self,
        names: &[N],
        pantry_names: &[S],
    ) -> Vec<MatchResult> {
        names
            .iter()
            .map(|name| self.match_ingredient(name.as_ref(), pantry_names))
            .collect()
    }
}

/// Match a single ingredient with the default matcher
pub fn match_ingredient<S: AsRef<str>>(name: &str, pantry_names: &[S]) -> MatchResult {
    IngredientMatcher::default().match_ingredient(name, pantry_names)
}

/// Match many ingredients with the default matcher
pub fn match_many<N: AsRef<str>, S: AsRef<str>>(names: &[N], pantry_names: &[S]) -> Vec<MatchResult> {
    IngredientMatcher::default().match_many(names, pantry_names)
}
