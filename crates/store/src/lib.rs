//! `medreg-store`: SQLite persistence for the registry pipeline.
//!
//! One database file holds the versioned records of every dataset (business
//! attributes as JSON, temporal bookkeeping as columns), the append-only
//! audit logs, per-run count history, and the idempotency ledger. All writes
//! of one import run go through a single [`RunTxn`] and commit atomically.

pub mod error;
mod queries;
pub mod rows;
pub mod store;

pub use error::StoreError;
pub use rows::{AbsenceRow, ChangeRow, DatasetCount, LedgerRow, RunRow, StoredRecord, Timeline};
pub use store::{RunTxn, Store};
