//! # couchlocal Store
//!
//! Document store trait and implementations for the couchlocal replication target.
//!
//! The replication target never touches persistence directly. It talks to a
//! [`DocumentStore`], which offers exactly three primitives:
//!
//! - `exists(id, rev)` - flat revision existence check
//! - `get(id)` - fetch the current body of a document
//! - `store(doc)` - persist a document, replacing any previous body for its id
//!
//! ## Design Principles
//!
//! - Documents are opaque JSON objects; revisions are never parsed
//! - No revision trees: a store knows only the current revision of each id
//! - Stores must be `Send + Sync` and serialize writes internally
//!
//! ## Available Stores
//!
//! - [`InMemoryDocumentStore`] - For testing and ephemeral targets
//! - [`FileDocumentStore`] - Append-only JSON-lines log that survives restarts
//!
//! ## Example
//!
//! ```rust
//! use couchlocal_store::{Document, DocumentStore, InMemoryDocumentStore};
//! use serde_json::json;
//!
//! let store = InMemoryDocumentStore::new();
//! let doc = Document::from_value(json!({"_id": "a", "_rev": "1-x"})).unwrap();
//! store.store(&doc).unwrap();
//! assert!(store.exists("a", "1-x"));
//! assert_eq!(store.get("a"), Some(doc));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod file;
mod memory;
mod store;

pub use document::{Document, ID_FIELDS, REV_FIELDS};
pub use error::{StoreError, StoreResult};
pub use file::{FileDocumentStore, FileStoreConfig};
pub use memory::InMemoryDocumentStore;
pub use store::DocumentStore;
