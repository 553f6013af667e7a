use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{BEST_OUTPUT_KEY, METRICS_KEY};
use crate::hashing::fingerprint_text;
use crate::scoring::{CandidateScorer, MetricResult};

use super::columns::CandidateColumns;
use super::selector::BestTracker;
use super::types::{BestOutput, CandidateCounts, EvalSettings, Record, RecordStatus, RerunPolicy};

/// Result of evaluating one record, computed without touching it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Rejected by the filter gate.
    Filtered,
    /// Reference missing or empty.
    MissingReference,
    Evaluated(Enrichment),
}

/// Changes to apply to an evaluated record.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// New container entries, keyed by column.
    pub updates: BTreeMap<String, MetricResult>,
    /// Columns whose stored entry was kept as is.
    pub reused: Vec<String>,
    pub best: Option<BestOutput>,
    pub counts: CandidateCounts,
}

impl Enrichment {
    /// Writes the container entries and best marker into `record`.
    ///
    /// A container of the wrong shape is replaced. Entries for other columns are kept.
    /// An existing marker is only overwritten when a new best exists.
    pub fn apply_to(self, record: &mut Record) {
        let container = record
            .entry(METRICS_KEY)
            .or_insert_with(|| Value::Object(Record::new()));
        if !container.is_object() {
            *container = Value::Object(Record::new());
        }
        if let Value::Object(entries) = container {
            for (column, result) in self.updates {
                entries.insert(column, result.to_json());
            }
        }

        if let Some(best) = self.best {
            match serde_json::to_value(&best) {
                Ok(marker) => {
                    record.insert(BEST_OUTPUT_KEY.to_string(), marker);
                }
                Err(e) => warn!(error = %e, "Failed to serialise best-output marker"),
            }
        }
    }
}

/// Scores every candidate column of a record and picks the best one.
pub struct Aggregator<S: CandidateScorer> {
    scorer: Arc<S>,
    settings: EvalSettings,
    columns: CandidateColumns,
}

impl<S: CandidateScorer> Clone for Aggregator<S> {
    fn clone(&self) -> Self {
        Self {
            scorer: Arc::clone(&self.scorer),
            settings: self.settings.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<S: CandidateScorer> std::fmt::Debug for Aggregator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("settings", &self.settings)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<S: CandidateScorer> Aggregator<S> {
    pub fn new(scorer: Arc<S>, settings: EvalSettings, columns: CandidateColumns) -> Self {
        Self {
            scorer,
            settings,
            columns,
        }
    }

    pub fn columns(&self) -> &CandidateColumns {
        &self.columns
    }

    pub fn settings(&self) -> &EvalSettings {
        &self.settings
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Computes the outcome for `record` without modifying it.
    pub fn evaluate(&self, record: &Record) -> RecordOutcome {
        if let Some(gate) = &self.settings.gate
            && !gate.admits(record)
        {
            debug!(field = gate.field(), "Record rejected by filter gate");
            return RecordOutcome::Filtered;
        }

        let reference = text_field(record, &self.settings.reference_field);
        if is_blank(reference) {
            return RecordOutcome::MissingReference;
        }

        let fact = self
            .settings
            .fact_field
            .as_deref()
            .map(|field| text_field(record, field))
            .unwrap_or("");

        let stored = match record.get(METRICS_KEY) {
            Some(Value::Object(entries)) => Some(entries),
            _ => None,
        };

        let criterion = self.settings.criterion;
        let mut tracker = BestTracker::new();
        let mut updates = BTreeMap::new();
        let mut reused = Vec::new();
        let mut counts = CandidateCounts::default();

        for column in self.columns.iter() {
            let text = text_field(record, column);
            if is_blank(text) {
                continue;
            }

            let fingerprint = fingerprint_text(text);

            if self.settings.rerun_policy == RerunPolicy::SkipUnchanged
                && let Some(metrics) = stored
                    .and_then(|entries| entries.get(column))
                    .and_then(MetricResult::from_json)
                    .and_then(|r| match r {
                        MetricResult::Success(m) => Some(m),
                        MetricResult::Failure(_) => None,
                    })
                && metrics.text_hash.as_deref() == Some(fingerprint.as_str())
            {
                debug!(column, "Reusing stored metrics for unchanged candidate");
                tracker.offer(column, criterion.value(&metrics));
                reused.push(column.to_string());
                counts.reused += 1;
                continue;
            }

            let result = match self.scorer.score(text, reference, fact) {
                Ok(metrics) => {
                    counts.scored += 1;
                    tracker.offer(column, criterion.value(&metrics));
                    MetricResult::Success(metrics.with_text_hash(fingerprint))
                }
                Err(e) => {
                    warn!(column, kind = e.kind(), error = %e, "Candidate scoring failed");
                    counts.failed += 1;
                    MetricResult::failed(&e)
                }
            };
            updates.insert(column.to_string(), result);
        }

        let best = tracker.into_marker(criterion);
        if let Some(marker) = &best {
            debug!(column = %marker.column, value = marker.value, "Selected best candidate");
        }

        RecordOutcome::Evaluated(Enrichment {
            updates,
            reused,
            best,
            counts,
        })
    }

    /// Evaluates `record` and returns its enriched form.
    pub fn enrich(&self, mut record: Record) -> (Record, RecordStatus) {
        let status = match self.evaluate(&record) {
            RecordOutcome::Filtered => RecordStatus::Filtered,
            RecordOutcome::MissingReference => RecordStatus::MissingReference,
            RecordOutcome::Evaluated(enrichment) => {
                let status = RecordStatus::Evaluated {
                    counts: enrichment.counts,
                    best_marked: enrichment.best.is_some(),
                };
                enrichment.apply_to(&mut record);
                status
            }
        };
        (record, status)
    }
}

/// String value of `field`, or `""` when missing or not a string.
fn text_field<'a>(record: &'a Record, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Empty or whitespace-only text is never scored.
fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
