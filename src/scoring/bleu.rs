//! Sentence BLEU against a single reference.

use crate::constants::BLEU_MAX_ORDER;

use super::error::ScoringError;
use super::tokenize::{ngram_counts, tokenize_13a};

/// BLEU with uniform weights, brevity penalty and no smoothing.
#[derive(Debug, Clone)]
pub struct BleuScorer {
    max_order: usize,
}

impl Default for BleuScorer {
    fn default() -> Self {
        Self {
            max_order: BLEU_MAX_ORDER,
        }
    }
}

impl BleuScorer {
    pub fn new(max_order: usize) -> Self {
        Self {
            max_order: max_order.max(1),
        }
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Scores one candidate against one reference. Result is in [0, 1].
    ///
    /// Fails when either side tokenizes to nothing: the brevity penalty is undefined.
    pub fn score(&self, candidate: &str, reference: &str) -> Result<f64, ScoringError> {
        let candidate_tokens = tokenize_13a(candidate);
        let reference_tokens = tokenize_13a(reference);

        if reference_tokens.is_empty() {
            return Err(ScoringError::ComputationFailed {
                reason: "reference has no tokens".to_string(),
            });
        }
        if candidate_tokens.is_empty() {
            return Err(ScoringError::ComputationFailed {
                reason: "candidate has no tokens".to_string(),
            });
        }

        let mut log_precision_sum = 0.0;
        let mut any_zero = false;

        for n in 1..=self.max_order {
            let candidate_ngrams = ngram_counts(&candidate_tokens, n);
            let reference_ngrams = ngram_counts(&reference_tokens, n);

            let matches: usize = candidate_ngrams
                .iter()
                .map(|(gram, count)| (*count).min(reference_ngrams.get(gram).copied().unwrap_or(0)))
                .sum();
            let possible = candidate_tokens.len().saturating_sub(n - 1);

            if possible == 0 || matches == 0 {
                any_zero = true;
                break;
            }
            log_precision_sum += (matches as f64 / possible as f64).ln();
        }

        let geo_mean = if any_zero {
            0.0
        } else {
            (log_precision_sum / self.max_order as f64).exp()
        };

        let ratio = candidate_tokens.len() as f64 / reference_tokens.len() as f64;
        let brevity_penalty = if ratio > 1.0 {
            1.0
        } else {
            (1.0 - 1.0 / ratio).exp()
        };

        Ok(geo_mean * brevity_penalty)
    }
}
