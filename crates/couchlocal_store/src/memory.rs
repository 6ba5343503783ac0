//! In-memory document store for testing.

use crate::document::Document;
use crate::error::StoreResult;
use crate::store::DocumentStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory document store.
///
/// This store keeps all documents in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral targets that don't need persistence
///
/// # Thread Safety
///
/// A single `RwLock` guards the document map: writes are serialized
/// globally, reads share the lock.
///
/// # Example
///
/// ```rust
/// use couchlocal_store::{Document, DocumentStore, InMemoryDocumentStore};
/// use serde_json::json;
///
/// let store = InMemoryDocumentStore::new();
/// store
///     .store(&Document::from_value(json!({"_id": "a", "_rev": "1-x"})).unwrap())
///     .unwrap();
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    docs: RwLock<HashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `docs`.
    ///
    /// Later documents replace earlier ones with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::MissingId`] if any document has no id.
    pub fn with_documents(docs: impl IntoIterator<Item = Document>) -> StoreResult<Self> {
        let store = Self::new();
        for doc in docs {
            store.store(&doc)?;
        }
        Ok(store)
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Returns true if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Returns the stored ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.docs.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Removes every document.
    pub fn clear(&self) {
        self.docs.write().clear();
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn exists(&self, id: &str, rev: &str) -> bool {
        self.docs
            .read()
            .get(id)
            .is_some_and(|doc| doc.rev() == Some(rev))
    }

    fn get(&self, id: &str) -> Option<Document> {
        self.docs.read().get(id).cloned()
    }

    fn store(&self, doc: &Document) -> StoreResult<()> {
        let id = doc.require_id()?.to_owned();
        self.docs.write().insert(id, doc.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn memory_new_is_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get("a").is_none());
    }

    #[test]
    fn memory_store_and_get() {
        let store = InMemoryDocumentStore::new();
        let a = doc(json!({"_id": "a", "_rev": "1-x", "n": 1}));
        store.store(&a).unwrap();

        assert_eq!(store.get("a"), Some(a));
        assert!(store.get("b").is_none());
    }

    #[test]
    fn memory_exists_matches_current_revision_only() {
        let store = InMemoryDocumentStore::new();
        store.store(&doc(json!({"_id": "a", "_rev": "1-x"}))).unwrap();
        assert!(store.exists("a", "1-x"));
        assert!(!store.exists("a", "2-y"));
        assert!(!store.exists("b", "1-x"));

        store.store(&doc(json!({"_id": "a", "_rev": "2-y"}))).unwrap();
        assert!(store.exists("a", "2-y"));
        assert!(!store.exists("a", "1-x"));
    }

    #[test]
    fn memory_document_without_rev_never_exists() {
        let store = InMemoryDocumentStore::new();
        store.store(&doc(json!({"_id": "a"}))).unwrap();
        assert!(store.get("a").is_some());
        assert!(!store.exists("a", ""));
    }

    #[test]
    fn memory_store_requires_id() {
        let store = InMemoryDocumentStore::new();
        let result = store.store(&doc(json!({"_rev": "1-x"})));
        assert!(matches!(result, Err(StoreError::MissingId)));
        assert!(store.is_empty());
    }

    #[test]
    fn memory_with_documents_and_clear() {
        let store = InMemoryDocumentStore::with_documents([
            doc(json!({"_id": "b"})),
            doc(json!({"_id": "a"})),
        ])
        .unwrap();
        assert_eq!(store.ids(), vec!["a".to_string(), "b".to_string()]);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn memory_concurrent_writers() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        let id = format!("doc-{}-{}", t, i);
                        store.store(&doc(json!({"_id": id, "_rev": "1-a"}))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 400);
        assert!(store.exists("doc-7-49", "1-a"));
    }
}
