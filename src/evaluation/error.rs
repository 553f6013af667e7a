use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// Neither the configured prefixes nor an explicit list yielded a candidate column.
    #[error("no candidate columns found ({reason})")]
    NoCandidateColumns { reason: String },

    /// A record that must be a key-value object was something else.
    #[error("expected a JSON object for {what}, found {found}")]
    NotAnObject {
        what: &'static str,
        found: &'static str,
    },
}

pub type EvalResult<T> = Result<T, EvalError>;
