//! `medreg-recon`: temporal reconciliation engine.
//!
//! Pure engine crate: receives the persisted set and the freshly imported
//! set of one entity type, returns the write-set and both audit batches.
//! No CLI or IO dependencies.

pub mod engine;
pub mod error;
pub mod outcome;

pub use engine::reconcile;
pub use error::ReconError;
pub use outcome::{ReconOutcome, ReconSummary};
