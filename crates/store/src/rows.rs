//! Untyped inspection rows. The run pipeline works with typed
//! [`Persisted`](medreg_domain::Persisted) records; these are what the
//! query side hands to the CLI, dates as ISO strings and attributes as raw
//! JSON, ready to print or serialize.

use serde::Serialize;

/// One persisted record as stored, independent of its entity type.
#[derive(Debug, Clone, Serialize)]
pub struct StoredRecord {
    pub id: i64,
    pub dataset: String,
    pub business_key: String,
    pub attributes: serde_json::Value,
    pub first_seen: String,
    pub missing_since: Option<String>,
}

/// One audited attribute transition.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRow {
    pub attribute: String,
    pub old_value: String,
    pub new_value: String,
    pub valid_from: String,
}

/// One closed absence window.
#[derive(Debug, Clone, Serialize)]
pub struct AbsenceRow {
    pub missing_from: String,
    pub missing_to: String,
}

/// Full provenance of one record: current state plus everything that ever
/// changed about it.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub record: StoredRecord,
    pub changes: Vec<ChangeRow>,
    pub absences: Vec<AbsenceRow>,
}

/// One dataset reconciled within one import run, with its full count
/// breakdown. Written once per dataset per run, never updated.
#[derive(Debug, Clone, Serialize)]
pub struct RunRow {
    pub run_id: String,
    pub family: String,
    pub dataset: String,
    pub valid_from: String,
    pub started_at: String,
    pub rows_read: i64,
    pub rows_mapped: i64,
    pub failed_missing: i64,
    pub failed_reference: i64,
    pub failed_format: i64,
    pub new_count: i64,
    pub unchanged_count: i64,
    pub updated_count: i64,
    pub reactivated_count: i64,
    pub newly_missing_count: i64,
    pub already_missing_count: i64,
    pub change_count: i64,
    pub absence_count: i64,
}

/// Active/missing record counts for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetCount {
    pub dataset: String,
    pub active: i64,
    pub missing: i64,
}

/// One idempotency ledger entry.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    pub family: String,
    pub period: String,
    pub digest: String,
    pub processed_at: String,
}
