//! Test fixtures and target helpers.
//!
//! Provides convenience functions for setting up targets over fresh stores
//! and for building common request bodies.

use couchlocal_store::{
    Document, FileDocumentStore, FileStoreConfig, InMemoryDocumentStore,
};
use couchlocal_target::{ReplicationTarget, TargetConfig};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A target over a temporary file store, with automatic cleanup.
pub struct TestFileTarget {
    /// The target instance.
    pub target: ReplicationTarget<FileDocumentStore>,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestFileTarget {
    /// Creates a target over an empty log in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = open_file_store(&temp_dir.path().join("docs.jsonl"));
        Self {
            target: ReplicationTarget::new(TargetConfig::default(), store),
            temp_dir,
        }
    }

    /// Returns the path of the store log.
    pub fn log_path(&self) -> PathBuf {
        self.temp_dir.path().join("docs.jsonl")
    }

    /// Drops the target and opens a new one over the same log.
    pub fn reopen(self) -> Self {
        let Self { target, temp_dir } = self;
        drop(target);
        let store = open_file_store(&temp_dir.path().join("docs.jsonl"));
        Self {
            target: ReplicationTarget::new(TargetConfig::default(), store),
            temp_dir,
        }
    }
}

impl Default for TestFileTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestFileTarget {
    type Target = ReplicationTarget<FileDocumentStore>;

    fn deref(&self) -> &Self::Target {
        &self.target
    }
}

fn open_file_store(path: &Path) -> FileDocumentStore {
    FileDocumentStore::open(FileStoreConfig::new(path).with_sync_on_write(false))
        .expect("Failed to open file store")
}

/// Creates a target over a fresh in-memory store.
pub fn memory_target() -> ReplicationTarget<InMemoryDocumentStore> {
    ReplicationTarget::new(TargetConfig::default(), InMemoryDocumentStore::new())
}

/// Creates a target sharing `store` with the caller.
pub fn shared_target(
    store: Arc<InMemoryDocumentStore>,
) -> ReplicationTarget<Arc<InMemoryDocumentStore>> {
    ReplicationTarget::new(TargetConfig::default(), store)
}

/// Creates an in-memory store holding one document per `(id, rev)` pair.
pub fn seeded_store(docs: &[(&str, &str)]) -> InMemoryDocumentStore {
    InMemoryDocumentStore::with_documents(docs.iter().map(|(id, rev)| doc(id, rev)))
        .expect("Failed to seed store")
}

/// Builds a document with the given `_id` and `_rev`.
pub fn doc(id: &str, rev: &str) -> Document {
    Document::from_value(json!({"_id": id, "_rev": rev})).expect("object literal")
}

/// Returns the request path addressing document `id`, percent-encoded.
pub fn doc_path(id: &str) -> String {
    format!("/{}", utf8_percent_encode(id, NON_ALPHANUMERIC))
}

/// Builds a `_bulk_docs` body from document bodies.
pub fn bulk_body(docs: impl IntoIterator<Item = Value>) -> Value {
    json!({ "docs": docs.into_iter().collect::<Vec<_>>() })
}
