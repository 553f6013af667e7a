use serde::{Deserialize, Serialize};

use super::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// ROUGE F-measures.
pub struct RougeScores {
    /// Unigram overlap.
    pub rouge1: f64,
    /// Bigram overlap.
    pub rouge2: f64,
    /// Sentence-level longest common subsequence.
    #[serde(rename = "rougeL")]
    pub rouge_l: f64,
    /// Summary-level (newline-split) longest common subsequence.
    #[serde(rename = "rougeLsum")]
    pub rouge_lsum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// BERTScore components (no baseline rescaling).
pub struct BertScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// Consistency sub-scores. `None` marks a sub-score that could not be computed.
pub struct ConsistencyScores {
    #[serde(default)]
    pub groundedness_fact: Option<f64>,
    #[serde(default)]
    pub groundedness_ref: Option<f64>,
    #[serde(default)]
    pub factual_fact: Option<f64>,
    #[serde(default)]
    pub factual_ref: Option<f64>,
}

impl ConsistencyScores {
    /// Number of sub-scores that were computed.
    pub fn available(&self) -> usize {
        [
            self.groundedness_fact,
            self.groundedness_ref,
            self.factual_fact,
            self.factual_ref,
        ]
        .iter()
        .filter(|s| s.is_some())
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Full metric payload for one candidate.
pub struct CandidateMetrics {
    #[serde(rename = "BLEU_score")]
    pub bleu: f64,
    #[serde(rename = "ROUGE")]
    pub rouge: RougeScores,
    #[serde(rename = "BERTScore")]
    pub bertscore: BertScore,
    #[serde(rename = "CTC")]
    pub consistency: ConsistencyScores,
    /// Fingerprint of the scored text, used to detect unchanged candidates on re-runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_hash: Option<String>,
}

impl CandidateMetrics {
    pub fn with_text_hash(mut self, hash: String) -> Self {
        self.text_hash = Some(hash);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Structured replacement for a candidate whose scoring failed.
pub struct MetricFailure {
    /// Human-readable description.
    pub error: String,
    /// Error category (see [`ScoringError::kind`]).
    pub kind: String,
}

impl From<&ScoringError> for MetricFailure {
    fn from(err: &ScoringError) -> Self {
        Self {
            error: format!("metric computation failed: {}", err),
            kind: err.kind().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Outcome for one candidate: exactly one of a success payload or a failure object.
pub enum MetricResult {
    Success(CandidateMetrics),
    Failure(MetricFailure),
}

impl MetricResult {
    /// Builds a failure result from a scorer error.
    pub fn failed(err: &ScoringError) -> Self {
        MetricResult::Failure(MetricFailure::from(err))
    }

    /// Returns `true` for the success shape.
    pub fn is_success(&self) -> bool {
        matches!(self, MetricResult::Success(_))
    }

    /// Returns the success payload, if any.
    pub fn metrics(&self) -> Option<&CandidateMetrics> {
        match self {
            MetricResult::Success(metrics) => Some(metrics),
            MetricResult::Failure(_) => None,
        }
    }

    /// Parses a stored container entry; unrecognised shapes yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Serialises into the stored JSON shape.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({
                "error": format!("failed to serialise metrics: {}", e),
                "kind": "serialization",
            })
        })
    }
}

impl std::fmt::Display for MetricResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricResult::Success(m) => {
                write!(f, "OK (BERTScore F1: {:.4})", m.bertscore.f1)
            }
            MetricResult::Failure(failure) => write!(f, "FAILED ({})", failure.kind),
        }
    }
}
