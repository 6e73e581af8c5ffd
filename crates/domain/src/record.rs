use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::diff::FieldChange;
use crate::key::BusinessKey;

/// Generated identifier of a persisted record (SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Behavior every reference-entity type supplies to the reconciliation
/// engine: where it lives, how it is keyed, and how two versions differ.
///
/// `diff` compares business attributes only; bookkeeping (`first_seen`,
/// `missing_since`) belongs to [`Persisted`] and is owned by the engine.
pub trait ReferenceEntity: Clone {
    const DATASET: Dataset;

    fn business_key(&self) -> BusinessKey;

    /// Field-by-field semantic comparison against the next version.
    /// Values are stringified only for the returned audit entries.
    fn diff(&self, next: &Self) -> Vec<FieldChange>;
}

// ---------------------------------------------------------------------------
// Versioned records
// ---------------------------------------------------------------------------

/// A reference entity as persisted, with temporal bookkeeping.
///
/// `missing_since` is null exactly while the entity appeared in the latest
/// import of its type; `first_seen` never moves backward once set.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub id: RecordId,
    pub entity: T,
    pub first_seen: NaiveDate,
    pub missing_since: Option<NaiveDate>,
}

impl<T> Persisted<T> {
    pub fn is_missing(&self) -> bool {
        self.missing_since.is_some()
    }
}

/// An entity seen for the first time, not yet persisted. `first_seen` is the
/// validity date of the import that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord<T> {
    pub entity: T,
    pub first_seen: NaiveDate,
}
