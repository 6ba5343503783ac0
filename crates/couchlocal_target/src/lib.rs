//! # couchlocal Target
//!
//! A local stand-in for a CouchDB replication peer.
//!
//! This crate answers the subset of the CouchDB HTTP API a replicator needs
//! to push documents, from a private on-device [`DocumentStore`]:
//!
//! | Method | Path | Answer |
//! |---|---|---|
//! | GET | `/` | placeholder database info |
//! | GET | `/_local[/...]` | always `DocNotFound` |
//! | GET | `/_changes[/...]` | always `{results: [], last_seq: 0}` |
//! | GET | `/{id}` | stored body, or `DocNotFound` |
//! | POST | `/_local[/...]` | always `UnimplementedEndpoint` |
//! | POST | `/_bulk_docs` | store every entry, answer `{}` |
//! | POST | `/_revs_diff` | revisions the store does not have |
//!
//! Any other `/_` path is an `UnsupportedInternalPath`.
//!
//! # Simplifications
//!
//! - No revision trees: revision existence is a flat `(id, rev)` check
//! - No change tracking: the changes feed is always empty
//! - No checkpoints: every replication starts from scratch
//! - No per-document bulk status: a bulk write succeeds as a whole or fails
//!   at the first document that cannot be stored
//!
//! # Usage
//!
//! ```rust
//! use couchlocal_target::{ReplicationTarget, TargetConfig};
//! use couchlocal_store::InMemoryDocumentStore;
//! use couchlocal_protocol::Request;
//! use serde_json::json;
//!
//! let target = ReplicationTarget::new(TargetConfig::default(), InMemoryDocumentStore::new());
//!
//! let missing = target
//!     .handle(Request::post("/_revs_diff", json!({"a": ["1-x"]})))
//!     .unwrap();
//! assert_eq!(missing, json!({"a": {"missing": ["1-x"]}}));
//!
//! let err = target.handle(Request::get("/_local/peer-1")).unwrap_err();
//! assert_eq!(err.status_code(), 404);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod router;
mod target;

pub use config::{TargetConfig, DEFAULT_DB_NAME};
pub use error::{TargetError, TargetResult};
pub use handler::RequestHandler;
pub use router::Route;
pub use target::ReplicationTarget;

pub use couchlocal_store::DocumentStore;
