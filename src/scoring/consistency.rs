//! Consistency / groundedness sub-scores.
//!
//! Each of the four sub-scores is computed on its own. A failing sub-score is logged and
//! recorded as `None`; it never aborts the others and never reaches the caller as an error.

use tracing::debug;

use crate::embedding::{AlignerConfig, ConsistencyAligner};

use super::error::ScoringError;
use super::tokenize::split_sentences;
use super::types::ConsistencyScores;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyAspect {
    /// Whole-candidate alignment with the grounding text.
    Groundedness,
    /// Mean per-sentence alignment with the grounding text.
    FactualConsistency,
}

impl ConsistencyAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyAspect::Groundedness => "groundedness",
            ConsistencyAspect::FactualConsistency => "factual_consistency",
        }
    }
}

#[derive(Debug)]
pub struct ConsistencyScorer {
    aligner: ConsistencyAligner,
}

impl ConsistencyScorer {
    pub fn new(config: AlignerConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            aligner: ConsistencyAligner::load(config)?,
        })
    }

    pub fn stub() -> Result<Self, ScoringError> {
        Ok(Self {
            aligner: ConsistencyAligner::stub()?,
        })
    }

    pub fn aligner(&self) -> &ConsistencyAligner {
        &self.aligner
    }

    /// Computes all four sub-scores for `candidate`.
    pub fn score(&self, candidate: &str, reference: &str, fact: &str) -> ConsistencyScores {
        ConsistencyScores {
            groundedness_fact: self.sub_score(ConsistencyAspect::Groundedness, fact, candidate, "fact"),
            groundedness_ref: self.sub_score(
                ConsistencyAspect::Groundedness,
                reference,
                candidate,
                "reference",
            ),
            factual_fact: self.sub_score(
                ConsistencyAspect::FactualConsistency,
                fact,
                candidate,
                "fact",
            ),
            factual_ref: self.sub_score(
                ConsistencyAspect::FactualConsistency,
                reference,
                candidate,
                "reference",
            ),
        }
    }

    /// One aspect against one grounding text.
    pub fn aspect(
        &self,
        aspect: ConsistencyAspect,
        grounding: &str,
        candidate: &str,
    ) -> Result<f64, ScoringError> {
        match aspect {
            ConsistencyAspect::Groundedness => {
                Ok(f64::from(self.aligner.align(grounding, candidate)?))
            }
            ConsistencyAspect::FactualConsistency => {
                let sentences = split_sentences(candidate);
                if sentences.is_empty() {
                    return Err(ScoringError::InvalidInput {
                        reason: "candidate has no sentences".to_string(),
                    });
                }

                let mut total = 0.0;
                for sentence in &sentences {
                    total += f64::from(self.aligner.align(grounding, sentence)?);
                }
                Ok(total / sentences.len() as f64)
            }
        }
    }

    fn sub_score(
        &self,
        aspect: ConsistencyAspect,
        grounding: &str,
        candidate: &str,
        source: &'static str,
    ) -> Option<f64> {
        match self.aspect(aspect, grounding, candidate) {
            Ok(score) if score.is_finite() => Some(score),
            Ok(score) => {
                debug!(aspect = aspect.as_str(), source, score, "Non-finite sub-score");
                None
            }
            Err(e) => {
                debug!(aspect = aspect.as_str(), source, error = %e, "Sub-score unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sub_scores_available() {
        let scorer = ConsistencyScorer::stub().unwrap();
        let scores = scorer.score(
            "O lucro cresceu.",
            "O lucro cresceu.",
            "O lucro da empresa cresceu em 2023.",
        );
        assert_eq!(scores.available(), 4);
        assert_eq!(scores.groundedness_fact, Some(1.0));
        assert_eq!(scores.groundedness_ref, Some(1.0));
    }

    #[test]
    fn test_empty_fact_degrades_only_fact_sub_scores() {
        let scorer = ConsistencyScorer::stub().unwrap();
        let scores = scorer.score("O lucro cresceu.", "O lucro cresceu.", "");
        assert_eq!(scores.groundedness_fact, None);
        assert_eq!(scores.factual_fact, None);
        assert!(scores.groundedness_ref.is_some());
        assert!(scores.factual_ref.is_some());
    }

    #[test]
    fn test_factual_consistency_averages_sentences() {
        let scorer = ConsistencyScorer::stub().unwrap();
        let score = scorer
            .aspect(
                ConsistencyAspect::FactualConsistency,
                "o lucro cresceu",
                "O lucro cresceu. A receita caiu.",
            )
            .unwrap();
        // First sentence fully aligned, second not at all.
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_groundedness_whole_candidate() {
        let scorer = ConsistencyScorer::stub().unwrap();
        let score = scorer
            .aspect(
                ConsistencyAspect::Groundedness,
                "o lucro cresceu",
                "O lucro cresceu. A receita caiu.",
            )
            .unwrap();
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_error_surfaces_directly() {
        let scorer = ConsistencyScorer::stub().unwrap();
        assert!(
            scorer
                .aspect(ConsistencyAspect::Groundedness, "", "O lucro cresceu.")
                .is_err()
        );
    }

    #[test]
    fn test_serialised_unavailable_is_null() {
        let scorer = ConsistencyScorer::stub().unwrap();
        let scores = scorer.score("O lucro cresceu.", "O lucro cresceu.", "");
        let json = serde_json::to_value(scores).unwrap();
        assert!(json["groundedness_fact"].is_null());
        assert!(json["groundedness_ref"].is_number());
    }
}
