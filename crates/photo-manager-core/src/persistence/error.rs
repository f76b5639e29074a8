use std::path::PathBuf;
use thiserror::Error;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Shard or directory could not be read or written
    #[error("Record store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Shard exists but is not a JSON array of records
    #[error("Failed to parse record shard {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be encoded
    #[error("Failed to serialize records: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Timestamp outside the representable calendar range
    #[error("Invalid record timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
