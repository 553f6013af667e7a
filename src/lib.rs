//! Candor library crate (used by the `candor` binary and integration tests).
//!
//! Enriches a batch of text-generation records with quality metrics and marks the best
//! candidate of each record.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Run configuration
//! - [`ScorerSet`], [`CandidateScorer`] - BLEU, ROUGE, BERTScore and consistency scoring
//! - [`MetricResult`], [`CandidateMetrics`] - Per-candidate success or failure payload
//!
//! ## Evaluation
//! - [`Aggregator`], [`RecordOutcome`] - Per-record scoring and selection
//! - [`CandidateColumns`], [`FilterGate`], [`BestOutput`] - Columns, gate and marker
//!
//! ## Batch
//! - [`BatchRunner`], [`BatchSummary`] - Ordered parallel execution over a record array
//! - [`load_records`], [`save_records`] - JSON input and atomic output
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod batch;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod evaluation;
pub mod hashing;
pub mod scoring;

pub use batch::{BatchError, BatchOutput, BatchRunner, BatchSummary, load_records, save_records};
pub use config::{Config, ConfigError};
pub use constants::{BEST_OUTPUT_KEY, CRITERION_BERTSCORE_F1, METRICS_KEY};
pub use embedding::{
    AlignerConfig, ConsistencyAligner, EmbeddingError, EncoderConfig, TokenEncoder,
};
pub use evaluation::{
    Aggregator, BestOutput, CandidateColumns, ColumnSpec, EvalError, EvalSettings, FilterGate,
    Record, RecordOutcome, RecordStatus, RerunPolicy, SelectionCriterion,
};
pub use hashing::fingerprint_text;
#[cfg(any(test, feature = "mock"))]
pub use scoring::MockCandidateScorer;
pub use scoring::{
    BertScore, CandidateMetrics, CandidateScorer, ConsistencyScores, MetricFailure, MetricResult,
    RougeScores, ScorerSet, ScoringError,
};
