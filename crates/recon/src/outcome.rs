use serde::Serialize;

use medreg_domain::{AttributeChange, NewRecord, Persisted, TemporaryAbsence};

/// Everything one reconciliation pass produces for one entity type.
///
/// `inserts` + `updates` is the complete write-set; unchanged and
/// already-missing records never appear here, which is the main performance
/// lever for large slowly-changing tables.
#[derive(Debug)]
pub struct ReconOutcome<T> {
    /// Business keys seen for the first time.
    pub inserts: Vec<NewRecord<T>>,
    /// Updated, reactivated, and newly-missing records, each at most once,
    /// with id and `first_seen` preserved.
    pub updates: Vec<Persisted<T>>,
    pub attribute_changes: Vec<AttributeChange>,
    pub absences: Vec<TemporaryAbsence>,
    pub summary: ReconSummary,
}

/// Per-classification counts reported after every run. Updated and
/// reactivated co-occur for a key that changed while it was away, so those
/// two counters may overlap; the others are disjoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub new: usize,
    pub unchanged: usize,
    pub updated: usize,
    pub reactivated: usize,
    pub newly_missing: usize,
    pub already_missing: usize,
    pub attribute_changes: usize,
    pub absences: usize,
}

impl ReconSummary {
    /// True when a re-run of the same snapshot would write nothing.
    pub fn is_noop(&self) -> bool {
        self.new == 0 && self.updated == 0 && self.reactivated == 0 && self.newly_missing == 0
    }
}
