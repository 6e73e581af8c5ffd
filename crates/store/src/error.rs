use std::fmt;

use medreg_domain::Dataset;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// A stored attribute blob does not round-trip through its entity type.
    /// Means the database was written by an incompatible version.
    Codec {
        dataset: Dataset,
        key: String,
        detail: String,
    },
    /// A stored date column holds something that is not an ISO date.
    BadDate { value: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "database error: {}", e),
            StoreError::Codec { dataset, key, detail } => {
                write!(f, "{} record '{}' does not decode: {}", dataset, key, detail)
            }
            StoreError::BadDate { value } => {
                write!(f, "stored date '{}' is not ISO-8601", value)
            }
        }
    }
}

impl std::error::Error for StoreError {}
