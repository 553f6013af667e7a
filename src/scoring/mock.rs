use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use super::error::ScoringError;
use super::scorer::CandidateScorer;
use super::types::{BertScore, CandidateMetrics, ConsistencyScores, RougeScores};

/// F1 reported by the mock for candidates without an explicit override.
pub const MOCK_DEFAULT_F1: f64 = 0.5;

/// Scripted scorer for tests: fixed F1 per candidate text, injectable failures.
#[derive(Default)]
pub struct MockCandidateScorer {
    failing: HashSet<String>,
    f1_by_text: HashMap<String, f64>,
    calls: Mutex<Vec<String>>,
}

impl MockCandidateScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `score` fail for this exact candidate text.
    pub fn fail_on(mut self, candidate: &str) -> Self {
        self.failing.insert(candidate.to_string());
        self
    }

    /// Sets the BERTScore F1 returned for this exact candidate text.
    pub fn with_f1(mut self, candidate: &str, f1: f64) -> Self {
        self.f1_by_text.insert(candidate.to_string(), f1);
        self
    }

    /// Candidate texts scored so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl CandidateScorer for MockCandidateScorer {
    fn score(
        &self,
        candidate: &str,
        _reference: &str,
        fact: &str,
    ) -> Result<CandidateMetrics, ScoringError> {
        self.calls.lock().push(candidate.to_string());

        if self.failing.contains(candidate) {
            return Err(ScoringError::ComputationFailed {
                reason: format!("mock failure for '{}'", candidate),
            });
        }

        let f1 = self
            .f1_by_text
            .get(candidate)
            .copied()
            .unwrap_or(MOCK_DEFAULT_F1);

        let grounded = (!fact.is_empty()).then_some(1.0);

        Ok(CandidateMetrics {
            bleu: 0.0,
            rouge: RougeScores {
                rouge1: 0.0,
                rouge2: 0.0,
                rouge_l: 0.0,
                rouge_lsum: 0.0,
            },
            bertscore: BertScore {
                precision: f1,
                recall: f1,
                f1,
            },
            consistency: ConsistencyScores {
                groundedness_fact: grounded,
                groundedness_ref: Some(1.0),
                factual_fact: grounded,
                factual_ref: Some(1.0),
            },
            text_hash: None,
        })
    }
}
