//! Candidate column discovery.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::error::{EvalError, EvalResult};
use super::types::{ColumnSpec, Record};

/// Returns every field name starting with one of `prefixes`, sorted and de-duplicated.
pub fn discover_columns<'a, I>(field_names: I, prefixes: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    field_names
        .into_iter()
        .filter(|name| prefixes.iter().any(|p| name.starts_with(p.as_str())))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Candidate columns resolved once per run. Always sorted and free of duplicates, which
/// makes the first-wins tie-break between equal scores deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateColumns(Vec<String>);

impl CandidateColumns {
    /// Resolves the column list against the first record of the batch.
    pub fn resolve(first_record: &Record, spec: &ColumnSpec) -> EvalResult<Self> {
        let columns: Vec<String> = match spec {
            ColumnSpec::Prefixes(prefixes) => {
                discover_columns(first_record.keys().map(String::as_str), prefixes)
            }
            ColumnSpec::Explicit(names) => {
                let set: BTreeSet<String> = names
                    .iter()
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .collect();
                for name in set.iter().filter(|n| !first_record.contains_key(*n)) {
                    warn!(column = %name, "Declared candidate column absent from first record");
                }
                set.into_iter().collect()
            }
        };

        if columns.is_empty() {
            return Err(EvalError::NoCandidateColumns {
                reason: spec.describe(),
            });
        }

        debug!(columns = ?columns, "Resolved candidate columns");
        Ok(Self(columns))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
