use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_SEQ_LEN;
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
pub struct AlignerConfig {
    pub model_path: Option<PathBuf>,

    pub max_seq_len: usize,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

impl AlignerConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len < 3 {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("max_seq_len must be at least 3, got {}", self.max_seq_len),
            });
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_path cannot be empty when provided".to_string(),
            });
        }

        Ok(())
    }
}
