//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    ///
    /// Raised for the reference and grounding-fact field names, which have no safe default.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// A variable was set but could not be interpreted.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A required setting resolved to an empty string.
    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },

    /// A list setting resolved to no entries.
    #[error("{name} must contain at least one entry")]
    EmptyList { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A model directory is missing one of its artefacts.
    #[error("model directory is missing {file}: {path}")]
    MissingModelFile { path: PathBuf, file: &'static str },
}
