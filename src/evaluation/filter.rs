use std::collections::BTreeSet;

use super::types::Record;

/// Allow-list check on one categorical record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGate {
    field: String,
    allow: BTreeSet<String>,
}

impl FilterGate {
    pub fn new(field: impl Into<String>, allow: BTreeSet<String>) -> Self {
        Self {
            field: field.into(),
            allow,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn allow_list(&self) -> &BTreeSet<String> {
        &self.allow
    }

    /// Returns `true` if the record's field holds an allow-listed string.
    ///
    /// Missing fields and non-string values are rejected.
    pub fn admits(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .and_then(|v| v.as_str())
            .is_some_and(|value| self.allow.contains(value))
    }
}
