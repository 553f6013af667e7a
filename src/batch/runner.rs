use std::path::Path;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info};

use crate::evaluation::{Aggregator, CandidateColumns, EvalError, EvalSettings, RecordStatus};
use crate::scoring::CandidateScorer;

use super::error::{BatchError, BatchResult};
use super::io::{json_kind, load_records, save_records};
use super::summary::BatchSummary;

/// Enriched records, in input order, plus run counters.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub records: Vec<Value>,
    pub summary: BatchSummary,
}

/// Drives the aggregator over a whole batch with bounded parallelism.
pub struct BatchRunner<S: CandidateScorer> {
    scorer: Arc<S>,
    settings: EvalSettings,
    workers: usize,
}

impl<S: CandidateScorer + 'static> BatchRunner<S> {
    pub fn new(scorer: Arc<S>, settings: EvalSettings) -> Self {
        Self {
            scorer,
            settings,
            workers: 1,
        }
    }

    /// Maximum number of records scored concurrently (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Enriches every record. Fails before scoring anything if the batch is empty,
    /// the first record is not an object, or it exposes no candidate column.
    pub async fn run(&self, records: Vec<Value>) -> BatchResult<BatchOutput> {
        let first = match records.first() {
            None => return Err(BatchError::EmptyInput),
            Some(Value::Object(first)) => first,
            Some(other) => {
                return Err(EvalError::NotAnObject {
                    what: "first record",
                    found: json_kind(other),
                }
                .into());
            }
        };

        let columns = CandidateColumns::resolve(first, &self.settings.column_spec)?;
        info!(
            records = records.len(),
            columns = columns.len(),
            workers = self.workers,
            rerun_policy = %self.settings.rerun_policy,
            "Starting batch"
        );

        let aggregator = Arc::new(Aggregator::new(
            Arc::clone(&self.scorer),
            self.settings.clone(),
            columns,
        ));

        let results: Vec<_> = stream::iter(records.into_iter().enumerate())
            .map(|(index, record)| {
                let aggregator = Arc::clone(&aggregator);
                async move {
                    tokio::task::spawn_blocking(move || process_record(&aggregator, index, record))
                        .await
                }
            })
            .buffered(self.workers)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        let mut enriched = Vec::with_capacity(results.len());
        for result in results {
            let (record, status) = result.map_err(|e| BatchError::WorkerFailed {
                reason: e.to_string(),
            })?;
            summary.record(status);
            enriched.push(record);
        }

        info!(
            total = summary.total,
            evaluated = summary.evaluated,
            filtered = summary.filtered,
            missing_reference = summary.missing_reference,
            failed = summary.candidates_failed,
            "{}",
            summary
        );

        Ok(BatchOutput {
            records: enriched,
            summary,
        })
    }

    /// Loads `input`, runs the batch and writes the result to `output`.
    ///
    /// Nothing is written when the run fails.
    pub async fn run_file(&self, input: &Path, output: &Path) -> BatchResult<BatchSummary> {
        let records = load_records(input)?;
        let BatchOutput { records, summary } = self.run(records).await?;
        save_records(output, &records)?;
        Ok(summary)
    }
}

fn process_record<S: CandidateScorer>(
    aggregator: &Aggregator<S>,
    index: usize,
    record: Value,
) -> (Value, RecordStatus) {
    match record {
        Value::Object(map) => {
            let (map, status) = aggregator.enrich(map);
            debug!(index, ?status, "Record done");
            (Value::Object(map), status)
        }
        other => {
            debug!(index, found = json_kind(&other), "Passing non-object record through");
            (other, RecordStatus::NotAnObject)
        }
    }
}
