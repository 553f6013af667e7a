//! Consistency aligner: estimates how well a hypothesis is supported by a grounding text.
//!
//! The model backend is a BERT pair classifier (`grounding [SEP] hypothesis`) whose single
//! logit is squashed to [0, 1]. The stub backend measures token alignment: the share of
//! hypothesis words that also occur in the grounding.

pub mod config;

#[cfg(test)]
mod tests;

pub use config::AlignerConfig;

use std::collections::HashSet;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{load_tokenizer_with_truncation, stub_words};

enum AlignerBackend {
    Model {
        model: BertClassifier,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

pub struct ConsistencyAligner {
    backend: AlignerBackend,
    config: AlignerConfig,
}

impl std::fmt::Debug for ConsistencyAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsistencyAligner")
            .field("model_loaded", &self.is_model_loaded())
            .field("config", &self.config)
            .finish()
    }
}

impl ConsistencyAligner {
    pub fn load(config: AlignerConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_path) = config.model_path.clone() else {
            warn!("No consistency model path configured, aligner running in STUB mode");
            return Ok(Self {
                backend: AlignerBackend::Stub,
                config,
            });
        };

        if !model_path.exists() {
            return Err(EmbeddingError::ModelNotFound { path: model_path });
        }

        for file in ["config.json", "model.safetensors"] {
            if !model_path.join(file).exists() {
                return Err(EmbeddingError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", file, model_path.display()),
                });
            }
        }

        let device = select_device("aligner")?;
        debug!(?device, "Selected compute device for aligner");

        info!(model_path = %model_path.display(), "Loading consistency aligner");

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            }
        })?;

        let tokenizer =
            load_tokenizer_with_truncation(&model_path, config.max_seq_len).map_err(|e| {
                EmbeddingError::TokenizationFailed {
                    reason: format!("Failed to load tokenizer: {}", e),
                }
            })?;

        info!("Consistency aligner loaded successfully");

        Ok(Self {
            backend: AlignerBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(AlignerConfig::stub())
    }

    /// Alignment score in [0, 1] of `hypothesis` against `grounding`.
    pub fn align(&self, grounding: &str, hypothesis: &str) -> Result<f32, EmbeddingError> {
        if grounding.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput { what: "grounding" });
        }
        if hypothesis.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput { what: "hypothesis" });
        }

        debug!(
            grounding_len = grounding.len(),
            hypothesis_len = hypothesis.len(),
            model_loaded = self.is_model_loaded(),
            "Aligning hypothesis with grounding"
        );

        match &self.backend {
            AlignerBackend::Model {
                model,
                tokenizer,
                device,
            } => Self::align_with_model(grounding, hypothesis, model, tokenizer, device),
            AlignerBackend::Stub => Self::align_stub(grounding, hypothesis),
        }
    }

    fn align_with_model(
        grounding: &str,
        hypothesis: &str,
        model: &BertClassifier,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<f32, EmbeddingError> {
        let tokens = tokenizer.encode((grounding, hypothesis), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let token_ids = Tensor::new(tokens.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(tokens.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(tokens.get_attention_mask(), device)?.unsqueeze(0)?;

        let logits = model
            .forward(&token_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let logit = logits
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "classifier returned no logits".to_string(),
            })?;

        Ok(1.0 / (1.0 + (-logit).exp()))
    }

    fn align_stub(grounding: &str, hypothesis: &str) -> Result<f32, EmbeddingError> {
        let grounding_words: HashSet<String> = stub_words(grounding).into_iter().collect();
        if grounding_words.is_empty() {
            return Err(EmbeddingError::EmptyInput {
                what: "grounding has no words",
            });
        }

        let hypothesis_words = stub_words(hypothesis);
        if hypothesis_words.is_empty() {
            return Err(EmbeddingError::EmptyInput {
                what: "hypothesis has no words",
            });
        }

        let aligned = hypothesis_words
            .iter()
            .filter(|w| grounding_words.contains(*w))
            .count();

        Ok(aligned as f32 / hypothesis_words.len() as f32)
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.backend, AlignerBackend::Model { .. })
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }
}
