//! File-level batch runs: load, enrich, atomic write.

mod common;

use std::sync::Arc;

use candor::batch::{BatchError, BatchRunner};
use candor::evaluation::EvalError;
use candor::scoring::{MockCandidateScorer, ScorerSet};
use candor::{BEST_OUTPUT_KEY, METRICS_KEY, fingerprint_text};
use serde_json::json;
use tempfile::TempDir;

use common::fixtures::{batch_value, read_json, sample_batch, settings, write_json};

#[tokio::test]
async fn test_run_file_writes_enriched_output() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "input.json", &batch_value(sample_batch()));
    let output = dir.path().join("output.json");

    let summary = BatchRunner::new(Arc::new(ScorerSet::stub().unwrap()), settings())
        .run_file(&input, &output)
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    let written = read_json(&output);
    let records = written.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records[0].get(METRICS_KEY).is_some());
    assert!(records[1].get(BEST_OUTPUT_KEY).is_some());
    assert!(records[2].get(METRICS_KEY).is_none());

    // Input is never modified.
    assert_eq!(read_json(&input), batch_value(sample_batch()));
}

#[tokio::test]
async fn test_run_file_output_can_be_fed_back() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "input.json", &batch_value(sample_batch()));
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    let runner = BatchRunner::new(Arc::new(ScorerSet::stub().unwrap()), settings());
    runner.run_file(&input, &first).await.unwrap();
    runner.run_file(&first, &second).await.unwrap();

    assert_eq!(read_json(&first), read_json(&second));
}

#[tokio::test]
async fn test_stored_text_hash_matches_candidate() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "input.json", &batch_value(sample_batch()));
    let output = dir.path().join("output.json");

    BatchRunner::new(Arc::new(MockCandidateScorer::new()), settings())
        .run_file(&input, &output)
        .await
        .unwrap();

    let written = read_json(&output);
    assert_eq!(
        written[0][METRICS_KEY]["generated_text_a"]["text_hash"],
        fingerprint_text("O lucro aumentou.")
    );
}

#[tokio::test]
async fn test_run_file_rejects_object_input() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "input.json", &json!({"reference": "r"}));
    let output = dir.path().join("output.json");

    let err = BatchRunner::new(Arc::new(MockCandidateScorer::new()), settings())
        .run_file(&input, &output)
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::NotAnArray { found: "an object" }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_run_file_rejects_empty_array() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "input.json", &json!([]));
    let output = dir.path().join("output.json");

    let err = BatchRunner::new(Arc::new(MockCandidateScorer::new()), settings())
        .run_file(&input, &output)
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::EmptyInput));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_run_file_without_candidate_columns_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "input.json",
        &json!([{"reference": "r", "answer": "a"}]),
    );
    let output = write_json(dir.path(), "output.json", &json!(["previous"]));

    let err = BatchRunner::new(Arc::new(MockCandidateScorer::new()), settings())
        .run_file(&input, &output)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Evaluation(EvalError::NoCandidateColumns { .. })
    ));
    assert_eq!(read_json(&output), json!(["previous"]));
}

#[test]
fn test_fingerprint_distinguishes_near_duplicates() {
    let texts = ["O lucro cresceu.", "O lucro cresceu", "o lucro cresceu.", "O lucro cresceu. "];
    let hashes: std::collections::HashSet<_> = texts.iter().map(|t| fingerprint_text(t)).collect();
    assert_eq!(hashes.len(), texts.len());
    assert_eq!(fingerprint_text(texts[0]), fingerprint_text("O lucro cresceu."));
}
