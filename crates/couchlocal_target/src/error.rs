//! Error types for the replication target.

use couchlocal_protocol::ProtocolError;
use couchlocal_store::StoreError;
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for target operations.
pub type TargetResult<T> = Result<T, TargetError>;

/// Every way a replication request can fail.
///
/// The target never retries or recovers: each failure is returned to the
/// transport, which picks the externally visible status. A `DocNotFound`
/// for a `/_local` checkpoint is the normal "no checkpoint yet" answer.
#[derive(Error, Debug)]
pub enum TargetError {
    /// The document, or any `/_local` checkpoint, does not exist.
    #[error("document not found: {0}")]
    DocNotFound(String),

    /// An internal (`/_`) path this target does not serve.
    #[error("unsupported internal path: {0}")]
    UnsupportedInternalPath(String),

    /// A known endpoint this target deliberately does not implement.
    #[error("endpoint not implemented")]
    UnimplementedEndpoint,

    /// A `_bulk_docs` body without a `docs` array.
    #[error("malformed bulk request: body has no `docs` array")]
    MalformedBulkRequest,

    /// The document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Any other unexpected failure.
    #[error("fatal error: {0}")]
    Fatal(String),
}

impl TargetError {
    /// Returns true if the caller is at fault (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TargetError::DocNotFound(_)
                | TargetError::UnsupportedInternalPath(_)
                | TargetError::MalformedBulkRequest
        )
    }

    /// Returns true if the target is at fault (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns true for the generic fatal failures.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TargetError::Store(_) | TargetError::Fatal(_))
    }

    /// Returns the HTTP status a transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            TargetError::DocNotFound(_) => 404,
            TargetError::UnsupportedInternalPath(_) | TargetError::MalformedBulkRequest => 400,
            TargetError::UnimplementedEndpoint => 501,
            TargetError::Store(_) | TargetError::Fatal(_) => 500,
        }
    }

    /// Returns the CouchDB-style `{"error", "reason"}` body for this failure.
    pub fn error_body(&self) -> Value {
        let (error, reason) = match self {
            TargetError::DocNotFound(_) => ("not_found", "missing".to_string()),
            TargetError::UnsupportedInternalPath(path) => {
                ("bad_request", format!("unsupported internal path: {}", path))
            }
            TargetError::UnimplementedEndpoint => {
                ("not_implemented", "endpoint not implemented".to_string())
            }
            TargetError::MalformedBulkRequest => (
                "bad_request",
                "POST body must include `docs` parameter.".to_string(),
            ),
            TargetError::Store(e) => ("unknown_error", e.to_string()),
            TargetError::Fatal(message) => ("unknown_error", message.clone()),
        };
        json!({ "error": error, "reason": reason })
    }
}

impl From<ProtocolError> for TargetError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::MissingDocs => TargetError::MalformedBulkRequest,
            other => TargetError::Fatal(other.to_string()),
        }
    }
}
