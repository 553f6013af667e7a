//! BERTScore: greedy cosine matching of contextual token embeddings.

use tracing::debug;

use crate::embedding::{EncoderConfig, TokenEncoder};

use super::error::ScoringError;
use super::types::BertScore;

#[derive(Debug)]
pub struct BertScorer {
    encoder: TokenEncoder,
}

impl BertScorer {
    pub fn new(config: EncoderConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            encoder: TokenEncoder::load(config)?,
        })
    }

    pub fn stub() -> Result<Self, ScoringError> {
        Ok(Self {
            encoder: TokenEncoder::stub()?,
        })
    }

    pub fn encoder(&self) -> &TokenEncoder {
        &self.encoder
    }

    pub fn model_id(&self) -> &str {
        &self.encoder.config().model_id
    }

    pub fn score(&self, candidate: &str, reference: &str) -> Result<BertScore, ScoringError> {
        let candidate_vectors = self.encoder.encode_tokens(candidate)?;
        let reference_vectors = self.encoder.encode_tokens(reference)?;

        let score = greedy_match(&candidate_vectors, &reference_vectors)?;

        debug!(
            candidate_tokens = candidate_vectors.len(),
            reference_tokens = reference_vectors.len(),
            f1 = score.f1,
            "Computed BERTScore"
        );

        Ok(score)
    }
}

/// Greedy matching over unit vectors.
///
/// Precision averages each candidate token's best similarity to any reference token,
/// recall does the converse, F1 is their harmonic mean.
pub fn greedy_match(
    candidate: &[Vec<f32>],
    reference: &[Vec<f32>],
) -> Result<BertScore, ScoringError> {
    if candidate.is_empty() || reference.is_empty() {
        return Err(ScoringError::InvalidInput {
            reason: "BERTScore needs at least one token on each side".to_string(),
        });
    }

    let similarity: Vec<Vec<f64>> = candidate
        .iter()
        .map(|c| reference.iter().map(|r| cosine(c, r)).collect())
        .collect();

    let precision = similarity
        .iter()
        .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .sum::<f64>()
        / candidate.len() as f64;

    let recall = (0..reference.len())
        .map(|j| {
            similarity
                .iter()
                .map(|row| row[j])
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .sum::<f64>()
        / reference.len() as f64;

    let f1 = if precision + recall != 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    if !f1.is_finite() {
        return Err(ScoringError::ComputationFailed {
            reason: format!("non-finite BERTScore (P={}, R={})", precision, recall),
        });
    }

    Ok(BertScore {
        precision,
        recall,
        f1,
    })
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}
