use std::path::PathBuf;
use thiserror::Error;

/// Failures in the input and storage layers around the calculator. Pricing itself cannot fail.
#[derive(Debug, Error)]
pub enum BillError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("usage CSV has no header row")]
    MissingHeader,

    #[error("unexpected headers in usage CSV: {found:?}, expected: {expected:?}")]
    UnexpectedHeaders {
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("malformed usage CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("bill store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rate '{0}'")]
    InvalidRate(String),

    #[error("invalid date '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: jiff::Error,
    },
}

impl BillError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
