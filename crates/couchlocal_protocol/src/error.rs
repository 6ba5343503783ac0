//! Error types for protocol parsing.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while interpreting protocol input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A `_bulk_docs` body without a `docs` array.
    #[error("bulk request has no `docs` array")]
    MissingDocs,

    /// An entry of the `docs` array is not a JSON object.
    #[error("bulk request entry {index} is not an object")]
    InvalidDocsEntry {
        /// Zero-based position in the `docs` array.
        index: usize,
    },

    /// A `_revs_diff` body of the wrong shape.
    #[error("invalid revs_diff request: {0}")]
    InvalidRevsDiff(String),
}
