use std::fmt;

use chrono::NaiveDate;
use medreg_domain::Dataset;

/// Contract violations surfaced by the engine. These are programming or
/// scheduling faults, never ordinary data noise, so a run fails loudly
/// instead of picking a candidate silently.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// The imported snapshot contains one business key twice.
    DuplicateImportedKey { dataset: Dataset, key: String },
    /// The persisted set contains one business key twice (the store's
    /// uniqueness constraint should make this impossible).
    DuplicatePersistedKey { dataset: Dataset, key: String },
    /// A record marked missing *after* the snapshot being reconciled
    /// reappeared in it; snapshots must be processed chronologically.
    OutOfOrderSnapshot {
        dataset: Dataset,
        key: String,
        missing_since: NaiveDate,
        valid_from: NaiveDate,
    },
    /// `valid_from` has no previous day, so no absence window can close.
    ValidFromOutOfRange { dataset: Dataset, valid_from: NaiveDate },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconError::DuplicateImportedKey { dataset, key } => {
                write!(f, "duplicate business key '{}' in imported {} snapshot", key, dataset)
            }
            ReconError::DuplicatePersistedKey { dataset, key } => {
                write!(f, "duplicate business key '{}' in persisted {} set", key, dataset)
            }
            ReconError::OutOfOrderSnapshot {
                dataset,
                key,
                missing_since,
                valid_from,
            } => write!(
                f,
                "{} record '{}' is marked missing since {} which is after the snapshot date {}",
                dataset, key, missing_since, valid_from
            ),
            ReconError::ValidFromOutOfRange { dataset, valid_from } => {
                write!(f, "validity date {} for {} has no previous day", valid_from, dataset)
            }
        }
    }
}

impl std::error::Error for ReconError {}
