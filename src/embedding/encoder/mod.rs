//! Contextual token encoder used by BERTScore.
//!
//! Produces one L2-normalised vector per non-special token. Use [`EncoderConfig::stub`]
//! for tests without model files: the stub maps each lowercased word to a fixed
//! pseudo-random vector, so identical words always match with similarity 1.0.

pub mod config;


pub use config::EncoderConfig;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{l2_normalize, load_tokenizer_with_truncation, stub_words};
use crate::hashing::hash_token;

const STUB_NAMESPACE: &str = "encoder";

enum EncoderBackend {
    Model {
        model: BertEncoder,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Token-level embedding generator (supports stub mode).
pub struct TokenEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model_id", &self.config.model_id)
            .field("layer", &self.config.layer)
            .finish()
    }
}

impl TokenEncoder {
    /// Loads the encoder from a config (stub mode when no model path is set).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_path) = config.model_path.clone() else {
            warn!(
                model_id = %config.model_id,
                "No encoder model path configured, BERTScore running in STUB mode"
            );
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        };

        if !model_path.exists() {
            return Err(EmbeddingError::ModelNotFound { path: model_path });
        }

        let device = select_device("encoder")?;
        debug!(?device, "Selected compute device for token encoder");

        info!(
            model_id = %config.model_id,
            model_path = %model_path.display(),
            layer = ?config.layer,
            "Loading BERTScore encoder"
        );

        let model = BertEncoder::load(&model_path, &device, config.layer).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;

        let tokenizer =
            load_tokenizer_with_truncation(&model_path, config.max_seq_len).map_err(|e| {
                EmbeddingError::TokenizationFailed {
                    reason: format!("Failed to load tokenizer: {}", e),
                }
            })?;

        info!(
            hidden_size = model.hidden_size(),
            num_layers = model.num_layers(),
            "BERTScore encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    /// Loads a stub encoder.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(EncoderConfig::stub())
    }

    /// Returns unit-length embeddings for every non-special token of `text`.
    pub fn encode_tokens(&self, text: &str) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let vectors = match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.encode_with_model(text, model, tokenizer, device)?,
            EncoderBackend::Stub => self.encode_stub(text),
        };

        if vectors.is_empty() {
            return Err(EmbeddingError::EmptyInput {
                what: "text produced no tokens",
            });
        }

        Ok(vectors)
    }

    fn encode_with_model(
        &self,
        text: &str,
        model: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let token_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Encoding tokens (transformer forward pass)"
        );

        let hidden = model
            .forward(&token_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Transformer forward pass failed: {}", e),
            })?
            .squeeze(0)?
            .to_vec2::<f32>()?;

        let special = encoding.get_special_tokens_mask();
        let vectors = hidden
            .into_iter()
            .zip(special.iter())
            .filter(|(_, is_special)| **is_special == 0)
            .map(|(mut v, _)| {
                l2_normalize(&mut v);
                v
            })
            .collect();

        Ok(vectors)
    }

    fn encode_stub(&self, text: &str) -> Vec<Vec<f32>> {
        stub_words(text)
            .iter()
            .map(|word| self.stub_vector(word))
            .collect()
    }

    fn stub_vector(&self, word: &str) -> Vec<f32> {
        let mut state = hash_token(STUB_NAMESPACE, word);
        let mut embedding = Vec::with_capacity(self.config.stub_dim);

        for _ in 0..self.config.stub_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(&mut embedding);
        embedding
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}
