//! Scorer set: lexical overlap (BLEU), recall-oriented overlap (ROUGE), embedding
//! similarity (BERTScore) and consistency/groundedness.
//!
//! # Failure isolation
//!
//! BLEU and BERTScore errors propagate out of [`CandidateScorer::score`]; the caller is
//! expected to replace the whole candidate result with a
//! [`MetricResult::Failure`](types::MetricResult). ROUGE cannot fail. The consistency
//! scorer absorbs its own failures per sub-score and reports them as `None`.

pub mod bertscore;
pub mod bleu;
pub mod consistency;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod rouge;
pub mod scorer;
pub mod tokenize;
pub mod types;


pub use bertscore::BertScorer;
pub use bleu::BleuScorer;
pub use consistency::{ConsistencyAspect, ConsistencyScorer};
pub use error::ScoringError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MOCK_DEFAULT_F1, MockCandidateScorer};
pub use rouge::RougeScorer;
pub use scorer::{CandidateScorer, ScorerSet};
pub use types::{
    BertScore, CandidateMetrics, ConsistencyScores, MetricFailure, MetricResult, RougeScores,
};
