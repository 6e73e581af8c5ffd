use chrono::NaiveDate;
use serde::Serialize;

use medreg_import::{FailureKind, RowFailure};
use medreg_recon::ReconSummary;

/// Count breakdown of one reconciled section, ready for logs and `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub dataset: String,
    pub rows_read: u64,
    pub rows_mapped: u64,
    pub failed_missing: u64,
    pub failed_reference: u64,
    pub failed_format: u64,
    pub new: u64,
    pub unchanged: u64,
    pub updated: u64,
    pub reactivated: u64,
    pub newly_missing: u64,
    pub already_missing: u64,
    pub attribute_changes: u64,
    pub absences: u64,
}

impl SectionReport {
    pub fn new(
        dataset: String,
        rows_read: usize,
        failures: &[RowFailure],
        summary: &ReconSummary,
    ) -> SectionReport {
        let count = |kind: FailureKind| failures.iter().filter(|f| f.kind == kind).count() as u64;
        SectionReport {
            dataset,
            rows_read: rows_read as u64,
            rows_mapped: (rows_read - failures.len()) as u64,
            failed_missing: count(FailureKind::MissingAttribute),
            failed_reference: count(FailureKind::UnknownReference),
            failed_format: count(FailureKind::InvalidFormat),
            new: summary.new as u64,
            unchanged: summary.unchanged as u64,
            updated: summary.updated as u64,
            reactivated: summary.reactivated as u64,
            newly_missing: summary.newly_missing as u64,
            already_missing: summary.already_missing as u64,
            attribute_changes: summary.attribute_changes as u64,
            absences: summary.absences as u64,
        }
    }
}

/// Everything one committed import run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub family: String,
    pub period: String,
    pub valid_from: NaiveDate,
    pub digest: String,
    pub sections: Vec<SectionReport>,
}

impl RunReport {
    /// True when no section wrote anything: the re-published snapshot was
    /// byte-for-byte equivalent in content.
    pub fn is_noop(&self) -> bool {
        self.sections.iter().all(|s| {
            s.new == 0 && s.updated == 0 && s.reactivated == 0 && s.newly_missing == 0
        })
    }
}

/// What an import invocation amounted to.
#[derive(Debug, Clone, Serialize)]
pub enum RunOutcome {
    /// The ledger already holds this family+period; nothing was read.
    AlreadyProcessed { family: String, period: String },
    Completed(RunReport),
}
