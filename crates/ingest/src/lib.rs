//! Import orchestration: one snapshot file in, one committed run out.
//!
//! A [`Family`] names a published snapshot file and the datasets inside it.
//! [`run_import`] checks the idempotency ledger, decodes the container,
//! maps and reconciles every section in dependency order inside a single
//! transaction, and reports what changed. A snapshot whose family+period is
//! already in the ledger is skipped without reading a byte of CSV.

pub mod error;
pub mod family;
pub mod period;
pub mod report;
pub mod run;

pub use error::IngestError;
pub use family::{Container, Family, Section, ALL_FAMILIES};
pub use period::{derive_period, DerivedPeriod};
pub use report::{RunOutcome, RunReport, SectionReport};
pub use run::{run_import, ImportSource, RunOptions};
