//! Document store trait definition.

use crate::document::Document;
use crate::error::StoreResult;
use std::sync::Arc;

/// The persistence seam of the replication target.
///
/// Stores are keyed by document id. There is no revision tree: a store
/// remembers the current body of each id, and `exists` answers a flat
/// "is `rev` the current revision of `id`" predicate.
///
/// # Invariants
///
/// - `get` returns exactly the body most recently passed to `store` for that id
/// - `exists(id, rev)` is true iff the current body for `id` carries revision `rev`
/// - Writes are serialized; reads never observe a half-written document
/// - Implementations must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryDocumentStore`] - For testing
/// - [`super::FileDocumentStore`] - For persistent storage
pub trait DocumentStore: Send + Sync {
    /// Returns true if revision `rev` of document `id` is known.
    fn exists(&self, id: &str, rev: &str) -> bool;

    /// Returns the current body of document `id`, if any.
    fn get(&self, id: &str) -> Option<Document>;

    /// Persists `doc` under its id, replacing any previous body.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document has no id
    /// - The write to the underlying medium fails
    fn store(&self, doc: &Document) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn exists(&self, id: &str, rev: &str) -> bool {
        (**self).exists(id, rev)
    }

    fn get(&self, id: &str) -> Option<Document> {
        (**self).get(id)
    }

    fn store(&self, doc: &Document) -> StoreResult<()> {
        (**self).store(doc)
    }
}
