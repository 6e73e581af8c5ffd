//! `medreg-domain`: shared vocabulary for the registry pipeline.
//!
//! Datasets, business keys, versioned records, field diffs, and the
//! append-only audit entry types. No IO dependencies.

pub mod audit;
pub mod dataset;
pub mod diff;
pub mod entities;
pub mod key;
pub mod record;

pub use audit::{AttributeChange, TemporaryAbsence};
pub use dataset::{Dataset, ALL_DATASETS};
pub use diff::{FieldChange, FieldDiff};
pub use key::BusinessKey;
pub use record::{NewRecord, Persisted, RecordId, ReferenceEntity};
