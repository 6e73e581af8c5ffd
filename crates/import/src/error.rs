use std::fmt;

use medreg_domain::Dataset;

/// Dataset-level failures: the whole file import aborts before any write,
/// the ledger stays unmarked, and the next cycle retries. Row-level noise is
/// [`RowFailure`](crate::RowFailure), which never aborts.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// ZIP container could not be opened or read.
    Zip(String),
    /// The container is readable but the expected member CSV is not in it.
    ZipMemberMissing { member: String },
    /// Bytes do not decode in the family's declared charset.
    Decode { charset: &'static str, detail: String },
    /// CSV structure problems: no header line, unreadable records.
    Csv(String),
    /// A required logical column has no alias in the header. Means the
    /// publisher changed the file shape; extend the alias list and retry.
    RequiredColumnMissing {
        dataset: Dataset,
        column: &'static str,
        aliases: &'static [&'static str],
        header: Vec<String>,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Zip(detail) => write!(f, "cannot read zip container: {}", detail),
            ImportError::ZipMemberMissing { member } => {
                write!(f, "zip container has no member '{}'", member)
            }
            ImportError::Decode { charset, detail } => {
                write!(f, "file is not valid {}: {}", charset, detail)
            }
            ImportError::Csv(detail) => write!(f, "malformed csv: {}", detail),
            ImportError::RequiredColumnMissing {
                dataset,
                column,
                aliases,
                header,
            } => write!(
                f,
                "{}: required column '{}' not found under any alias [{}] in header [{}]",
                dataset,
                column,
                aliases.join(", "),
                header.join("; ")
            ),
        }
    }
}

impl std::error::Error for ImportError {}
