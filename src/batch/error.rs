use std::path::PathBuf;

use thiserror::Error;

use crate::evaluation::EvalError;

/// Run-level failures. Any of these aborts the batch before output is written.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to parse {path} as JSON: {reason}")]
    InvalidJson { path: PathBuf, reason: String },

    #[error("input must be a JSON array of records, found {found}")]
    NotAnArray { found: &'static str },

    #[error("input contains no records")]
    EmptyInput,

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("evaluation setup failed: {0}")]
    Evaluation(#[from] EvalError),

    #[error("record worker failed: {reason}")]
    WorkerFailed { reason: String },
}

pub type BatchResult<T> = Result<T, BatchError>;
