//! Error types for document store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The value handed to the store is not a JSON object.
    #[error("document is not a JSON object")]
    NotAnObject,

    /// The document carries no usable id.
    #[error("document has no string `_id` or `id` field")]
    MissingId,

    /// The store log contains an unreadable record.
    #[error("store log corrupted at line {line}: {message}")]
    Corrupted {
        /// One-based line number of the bad record.
        line: usize,
        /// Description of the corruption.
        message: String,
    },

    /// Another handle already holds the store log.
    #[error("store log is locked by another process: {}", .0.display())]
    Locked(PathBuf),
}
