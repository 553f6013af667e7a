//! Record loading and atomic output writing.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::error::{BatchError, BatchResult};

/// Reads a JSON array of records. Rejects other top-level shapes and empty arrays.
pub fn load_records(path: &Path) -> BatchResult<Vec<Value>> {
    let raw = fs::read_to_string(path).map_err(|e| BatchError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parsed: Value = serde_json::from_str(&raw).map_err(|e| BatchError::InvalidJson {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let records = into_records(parsed)?;
    info!(path = %path.display(), records = records.len(), "Loaded records");
    Ok(records)
}

/// Unwraps a top-level JSON array, checking it is non-empty.
pub fn into_records(value: Value) -> BatchResult<Vec<Value>> {
    match value {
        Value::Array(records) if records.is_empty() => Err(BatchError::EmptyInput),
        Value::Array(records) => Ok(records),
        other => Err(BatchError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

/// Writes `records` as pretty-printed JSON, replacing `path` atomically.
///
/// The temp file is created next to the target so the final rename stays on one
/// filesystem.
pub fn save_records(path: &Path, records: &[Value]) -> BatchResult<()> {
    let write_err = |reason: String| BatchError::WriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, records)
            .map_err(|e| write_err(e.to_string()))?;
        writer.write_all(b"\n").map_err(|e| write_err(e.to_string()))?;
        writer.flush().map_err(|e| write_err(e.to_string()))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_err(e.to_string()))?;

    debug!(tmp = %tmp.path().display(), "Persisting output");
    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;

    info!(path = %path.display(), records = records.len(), "Wrote records");
    Ok(())
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
