use tracing::info;

use crate::config::Config;
use crate::embedding::{AlignerConfig, EncoderConfig};

use super::bertscore::BertScorer;
use super::bleu::BleuScorer;
use super::consistency::ConsistencyScorer;
use super::error::ScoringError;
use super::rouge::RougeScorer;
use super::types::CandidateMetrics;

/// Computes the full metric payload for one candidate.
///
/// Implementations must be safe to call concurrently: the batch driver shares one
/// instance across all workers.
pub trait CandidateScorer: Send + Sync {
    /// Scores `candidate` against `reference` (and `fact` for grounding sub-scores).
    ///
    /// An `Err` discards the whole candidate. Consistency sub-score failures must be
    /// absorbed inside the returned payload instead.
    fn score(
        &self,
        candidate: &str,
        reference: &str,
        fact: &str,
    ) -> Result<CandidateMetrics, ScoringError>;
}

/// The four scorers, loaded once and shared read-only for the whole batch.
pub struct ScorerSet {
    lexical: BleuScorer,
    overlap: RougeScorer,
    similarity: BertScorer,
    consistency: ConsistencyScorer,
}

impl std::fmt::Debug for ScorerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScorerSet")
            .field("bleu_max_order", &self.lexical.max_order())
            .field("similarity", &self.similarity)
            .field("consistency", &self.consistency)
            .finish()
    }
}

impl ScorerSet {
    /// Loads every model-backed scorer.
    pub fn load(encoder: EncoderConfig, aligner: AlignerConfig) -> Result<Self, ScoringError> {
        let similarity = BertScorer::new(encoder)?;
        let consistency = ConsistencyScorer::new(aligner)?;

        info!(
            encoder = %similarity.model_id(),
            encoder_stub = similarity.encoder().is_stub(),
            aligner_loaded = consistency.aligner().is_model_loaded(),
            "Scorer set ready"
        );

        Ok(Self {
            lexical: BleuScorer::default(),
            overlap: RougeScorer::new(),
            similarity,
            consistency,
        })
    }

    /// Loads scorers as described by the run configuration.
    pub fn from_config(config: &Config) -> Result<Self, ScoringError> {
        Self::load(config.encoder_config(), config.aligner_config())
    }

    /// Scorer set with stub model backends (no model files needed).
    pub fn stub() -> Result<Self, ScoringError> {
        Self::load(EncoderConfig::stub(), AlignerConfig::stub())
    }

    /// Returns `true` when any model-backed scorer runs in stub mode.
    pub fn is_stub(&self) -> bool {
        self.similarity.encoder().is_stub() || !self.consistency.aligner().is_model_loaded()
    }

    /// Releases the loaded models.
    pub fn shutdown(self) {
        info!(encoder = %self.similarity.model_id(), "Releasing scorer models");
        drop(self);
    }
}

impl CandidateScorer for ScorerSet {
    fn score(
        &self,
        candidate: &str,
        reference: &str,
        fact: &str,
    ) -> Result<CandidateMetrics, ScoringError> {
        let bleu = self.lexical.score(candidate, reference)?;
        let rouge = self.overlap.score(candidate, reference);
        let bertscore = self.similarity.score(candidate, reference)?;
        let consistency = self.consistency.score(candidate, reference, fact);

        Ok(CandidateMetrics {
            bleu,
            rouge,
            bertscore,
            consistency,
            text_hash: None,
        })
    }
}
