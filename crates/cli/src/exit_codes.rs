//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; cron wrappers rely on them.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success, including an already-processed period      |
//! | 1    | General error (unspecified)                         |
//! | 2    | Usage error (bad args, missing file, undated input) |
//! | 3    | Duplicate business key in a snapshot or in the DB   |
//! | 4    | Column schema resolution failed (required column)   |
//! | 5    | Decode, ZIP, or CSV structure failure               |
//! | 6    | Store (SQLite) failure                              |
//! | 7    | Fetch failure (--url source)                        |
//!
//! An already-processed period is deliberately exit 0: the scheduled job
//! re-downloading last month's file is the normal case, not a fault.

use medreg_ingest::IngestError;
use medreg_store::StoreError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options, unreadable input.
pub const EXIT_USAGE: u8 = 2;

/// One business key appeared twice, either inside the imported snapshot or
/// inside the persisted set.
pub const EXIT_DUPLICATE_KEY: u8 = 3;

/// A required column matched no alias in the header.
pub const EXIT_SCHEMA: u8 = 4;

/// Charset decoding, ZIP extraction, or CSV structure failure.
pub const EXIT_DECODE: u8 = 5;

/// SQLite error while reading or writing the registry database.
pub const EXIT_STORE: u8 = 6;

/// Download of a --url source failed or returned a non-success status.
pub const EXIT_FETCH: u8 = 7;

/// Map an import pipeline error to its exit code.
pub fn import_exit_code(err: &IngestError) -> u8 {
    use medreg_import::ImportError;
    use medreg_recon::ReconError;

    match err {
        IngestError::Import(ImportError::RequiredColumnMissing { .. }) => EXIT_SCHEMA,
        IngestError::Import(_) => EXIT_DECODE,
        IngestError::Recon(
            ReconError::DuplicateImportedKey { .. } | ReconError::DuplicatePersistedKey { .. },
        ) => EXIT_DUPLICATE_KEY,
        IngestError::Recon(_) => EXIT_ERROR,
        IngestError::Store(_) => EXIT_STORE,
        IngestError::SourceUndated { .. } => EXIT_USAGE,
        IngestError::UnknownFamily { .. } => EXIT_USAGE,
    }
}

/// Map a direct store error (status/active/history/runs) to its exit code.
pub fn store_exit_code(_err: &StoreError) -> u8 {
    EXIT_STORE
}
