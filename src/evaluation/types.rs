use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CRITERION_BERTSCORE_F1;
use crate::scoring::CandidateMetrics;

use super::filter::FilterGate;

/// A record: field name to JSON value, schema not fixed in advance.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// How candidate columns are declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Every field of the first record starting with one of these prefixes.
    Prefixes(Vec<String>),
    /// Exactly these fields.
    Explicit(Vec<String>),
}

impl ColumnSpec {
    pub(crate) fn describe(&self) -> String {
        match self {
            ColumnSpec::Prefixes(prefixes) => {
                format!("no field matches prefixes [{}]", prefixes.join(", "))
            }
            ColumnSpec::Explicit(_) => "explicit column list is empty".to_string(),
        }
    }
}

/// What to do with columns that already carry a metric entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RerunPolicy {
    /// Recompute every non-empty column.
    #[default]
    Refresh,
    /// Keep a stored success entry whose text fingerprint still matches.
    SkipUnchanged,
}

impl RerunPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RerunPolicy::Refresh => "refresh",
            RerunPolicy::SkipUnchanged => "skip-unchanged",
        }
    }
}

impl FromStr for RerunPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refresh" => Ok(RerunPolicy::Refresh),
            "skip-unchanged" | "skip_unchanged" => Ok(RerunPolicy::SkipUnchanged),
            other => Err(format!(
                "unknown rerun policy '{}' (expected refresh or skip-unchanged)",
                other
            )),
        }
    }
}

impl fmt::Display for RerunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criterion used to pick the best candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionCriterion {
    #[default]
    BertScoreF1,
}

impl SelectionCriterion {
    /// Identifier written into the best-output marker.
    pub fn id(&self) -> &'static str {
        match self {
            SelectionCriterion::BertScoreF1 => CRITERION_BERTSCORE_F1,
        }
    }

    /// Comparable value of a success payload.
    pub fn value(&self, metrics: &CandidateMetrics) -> f64 {
        match self {
            SelectionCriterion::BertScoreF1 => metrics.bertscore.f1,
        }
    }
}

impl FromStr for SelectionCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bertscore_f1" | "bertscore-f1" => Ok(SelectionCriterion::BertScoreF1),
            other => Err(format!(
                "unknown selection criterion '{}' (expected bertscore_f1)",
                other
            )),
        }
    }
}

impl fmt::Display for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Per-record evaluation settings.
#[derive(Debug, Clone)]
pub struct EvalSettings {
    pub column_spec: ColumnSpec,
    pub reference_field: String,
    /// `None` scores every candidate against an empty fact.
    pub fact_field: Option<String>,
    /// `None` admits every record.
    pub gate: Option<FilterGate>,
    pub rerun_policy: RerunPolicy,
    pub criterion: SelectionCriterion,
}

impl EvalSettings {
    pub fn new(column_spec: ColumnSpec, reference_field: impl Into<String>) -> Self {
        Self {
            column_spec,
            reference_field: reference_field.into(),
            fact_field: None,
            gate: None,
            rerun_policy: RerunPolicy::default(),
            criterion: SelectionCriterion::default(),
        }
    }

    pub fn with_fact_field(mut self, field: impl Into<String>) -> Self {
        self.fact_field = Some(field.into());
        self
    }

    pub fn with_gate(mut self, gate: FilterGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_rerun_policy(mut self, policy: RerunPolicy) -> Self {
        self.rerun_policy = policy;
        self
    }
}

/// Marker identifying the winning candidate of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestOutput {
    pub column: String,
    pub criterion: String,
    pub value: f64,
}

/// Per-record counters reported back to the batch driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateCounts {
    pub scored: usize,
    pub failed: usize,
    pub reused: usize,
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Evaluated {
        counts: CandidateCounts,
        best_marked: bool,
    },
    Filtered,
    MissingReference,
    NotAnObject,
}
