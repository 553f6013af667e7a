//! Per-record evaluation: column discovery, the filter gate, metric aggregation and
//! best-candidate selection.
//!
//! [`Aggregator::evaluate`] borrows a record and returns a [`RecordOutcome`] describing
//! the changes; [`Enrichment::apply_to`] writes them. A record whose reference is empty,
//! or that the [`FilterGate`] rejects, comes back unchanged.
//!
//! Candidate failures never escape as errors. They are stored as
//! [`MetricResult::Failure`](crate::scoring::MetricResult) entries next to the
//! successful ones and are ignored by selection.

pub mod aggregator;
pub mod columns;
pub mod error;
pub mod filter;
pub mod selector;
pub mod types;


pub use aggregator::{Aggregator, Enrichment, RecordOutcome};
pub use columns::{CandidateColumns, discover_columns};
pub use error::{EvalError, EvalResult};
pub use filter::FilterGate;
pub use selector::BestTracker;
pub use types::{
    BestOutput, CandidateCounts, ColumnSpec, EvalSettings, Record, RecordStatus, RerunPolicy,
    SelectionCriterion,
};
