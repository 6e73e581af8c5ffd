use std::fmt;

use medreg_import::ImportError;
use medreg_recon::ReconError;
use medreg_store::StoreError;

/// Anything that aborts an import run. The transaction is dropped unwritten
/// and the ledger stays unmarked, so the same snapshot is retried next cycle.
#[derive(Debug)]
pub enum IngestError {
    Import(ImportError),
    Recon(ReconError),
    Store(StoreError),
    /// Neither the source name nor the command line yields a period and
    /// validity date.
    SourceUndated { name: String },
    /// The requested family code is not one of the known schedules.
    UnknownFamily { code: String },
}

impl From<ImportError> for IngestError {
    fn from(e: ImportError) -> Self {
        IngestError::Import(e)
    }
}

impl From<ReconError> for IngestError {
    fn from(e: ReconError) -> Self {
        IngestError::Recon(e)
    }
}

impl From<StoreError> for IngestError {
    fn from(e: StoreError) -> Self {
        IngestError::Store(e)
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Import(e) => write!(f, "import failed: {}", e),
            IngestError::Recon(e) => write!(f, "reconciliation failed: {}", e),
            IngestError::Store(e) => write!(f, "persistence failed: {}", e),
            IngestError::SourceUndated { name } => write!(
                f,
                "cannot derive a period from '{}'; pass --period and --valid-from",
                name
            ),
            IngestError::UnknownFamily { code } => {
                write!(f, "unknown dataset family '{}'", code)
            }
        }
    }
}

impl std::error::Error for IngestError {}
