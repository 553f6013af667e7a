use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}

impl ScoringError {
    /// Stable category label written into failure objects.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::Embedding(_) => "embedding",
            ScoringError::InvalidInput { .. } => "invalid_input",
            ScoringError::ComputationFailed { .. } => "computation_failed",
        }
    }
}
