//! Model utilities backing the model-based scorers.
//!
//! - [`encoder`] provides contextual token embeddings for BERTScore.
//! - [`aligner`] provides grounding alignment used by the consistency scorer.

/// Consistency aligner (CTC-style).
pub mod aligner;
/// BERT wrappers (token encoder body and pair classifier).
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Token encoder (BERTScore).
pub mod encoder;
mod error;
/// Tokenizer loading and stub helpers.
pub mod utils;

pub use aligner::{AlignerConfig, ConsistencyAligner};
pub use encoder::{EncoderConfig, TokenEncoder};
pub use error::EmbeddingError;
