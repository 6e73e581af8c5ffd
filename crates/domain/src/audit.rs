use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::record::RecordId;

// ---------------------------------------------------------------------------
// Append-only audit entries
// ---------------------------------------------------------------------------

/// One attribute-level change observed between two snapshots of the same
/// business key. Written exactly when the typed values differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub dataset: Dataset,
    pub record: RecordId,
    pub attribute: &'static str,
    pub old_value: String,
    pub new_value: String,
    /// Validity date of the dataset revision in which the change appeared.
    pub valid_from: NaiveDate,
}

/// A closed absence window, written exactly when a previously-missing record
/// reappears. `missing_to` is the day before the reactivating snapshot's
/// validity date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporaryAbsence {
    pub dataset: Dataset,
    pub record: RecordId,
    pub missing_from: NaiveDate,
    pub missing_to: NaiveDate,
}
