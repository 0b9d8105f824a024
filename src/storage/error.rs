//! Error types for record sinks

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sink operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while persisting a record
#[derive(Error, Debug)]
pub enum StorageError {
    /// Opening the record file failed
    #[error("failed to open record {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while appending or flushing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink refuses writes (e.g. test doubles, closed sinks)
    #[error("record sink unavailable: {0}")]
    Unavailable(String),
}
