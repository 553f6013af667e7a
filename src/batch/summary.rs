use std::fmt;

use crate::evaluation::RecordStatus;

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub evaluated: usize,
    pub filtered: usize,
    pub missing_reference: usize,
    pub non_object: usize,
    pub candidates_scored: usize,
    pub candidates_failed: usize,
    pub candidates_reused: usize,
    pub best_marked: usize,
}

impl BatchSummary {
    pub fn record(&mut self, status: RecordStatus) {
        self.total += 1;
        match status {
            RecordStatus::Evaluated {
                counts,
                best_marked,
            } => {
                self.evaluated += 1;
                self.candidates_scored += counts.scored;
                self.candidates_failed += counts.failed;
                self.candidates_reused += counts.reused;
                if best_marked {
                    self.best_marked += 1;
                }
            }
            RecordStatus::Filtered => self.filtered += 1,
            RecordStatus::MissingReference => self.missing_reference += 1,
            RecordStatus::NotAnObject => self.non_object += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} of {} records ({} filtered, {} without reference, {} candidates scored, {} failed, {} reused)",
            self.evaluated,
            self.total,
            self.filtered,
            self.missing_reference,
            self.candidates_scored,
            self.candidates_failed,
            self.candidates_reused
        )
    }
}
