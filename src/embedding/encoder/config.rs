use std::path::PathBuf;

use crate::constants::{DEFAULT_BERTSCORE_MODEL, DEFAULT_MAX_SEQ_LEN, STUB_EMBEDDING_DIM};
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`TokenEncoder`](super::TokenEncoder).
pub struct EncoderConfig {
    /// Encoder identifier (reported in logs and validated non-empty).
    pub model_id: String,
    /// Directory with `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` selects the deterministic stub backend.
    pub model_path: Option<PathBuf>,
    /// Hidden layer to read token embeddings from (`None` = last layer).
    pub layer: Option<usize>,
    /// Max tokens per text.
    pub max_seq_len: usize,
    /// Width of stub embeddings.
    pub stub_dim: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_BERTSCORE_MODEL.to_string(),
            model_path: None,
            layer: crate::constants::default_layer_for(DEFAULT_BERTSCORE_MODEL),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            stub_dim: STUB_EMBEDDING_DIM,
        }
    }
}

impl EncoderConfig {
    /// Creates a config pointing at a local model directory.
    pub fn new<S: Into<String>, P: Into<PathBuf>>(model_id: S, model_path: P) -> Self {
        let model_id = model_id.into();
        Self {
            layer: crate::constants::default_layer_for(&model_id),
            model_id,
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: Option<usize>) -> Self {
        self.layer = layer;
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.model_id.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "encoder model identifier cannot be empty".to_string(),
            });
        }

        if self.max_seq_len < 3 {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("max_seq_len must be at least 3, got {}", self.max_seq_len),
            });
        }

        if self.stub_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub_dim must be positive".to_string(),
            });
        }

        if self.layer == Some(0) {
            return Err(EmbeddingError::InvalidConfig {
                reason: "layer index starts at 1".to_string(),
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

    pub fn is_stub(&self) -> bool {
        self.model_path.is_none()
    }
}
