use tracing::debug;

use super::types::{BestOutput, SelectionCriterion};

/// Running best across one record's candidates.
///
/// Only finite values are comparable. A later candidate replaces the current best only
/// when strictly greater, so among equal values the first offered keeps the marker.
#[derive(Debug, Clone, Default)]
pub struct BestTracker {
    best: Option<(String, f64)>,
}

impl BestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a candidate value. Returns `true` if it became the new best.
    pub fn offer(&mut self, column: &str, value: f64) -> bool {
        if !value.is_finite() {
            debug!(column, value, "Ignoring non-comparable selection value");
            return false;
        }

        let improves = match &self.best {
            Some((_, current)) => value > *current,
            None => true,
        };

        if improves {
            self.best = Some((column.to_string(), value));
        }
        improves
    }

    pub fn current(&self) -> Option<(&str, f64)> {
        self.best.as_ref().map(|(c, v)| (c.as_str(), *v))
    }

    /// Builds the marker, or `None` when no comparable value was offered.
    pub fn into_marker(self, criterion: SelectionCriterion) -> Option<BestOutput> {
        self.best.map(|(column, value)| BestOutput {
            column,
            criterion: criterion.id().to_string(),
            value,
        })
    }
}
