//! Request handlers for replication endpoints.

use crate::config::TargetConfig;
use crate::error::{TargetError, TargetResult};
use couchlocal_protocol::{
    BulkDocsAck, BulkDocsRequest, ChangesFeed, DbInfo, QueryParams, RevsDiffRequest,
    RevsDiffResponse,
};
use couchlocal_store::{Document, DocumentStore};
use serde_json::Value;
use tracing::{debug, warn};

/// Handlers for the individual endpoints.
///
/// Each handler runs to completion on the calling thread. The only state is
/// the configuration and the store handle.
pub struct RequestHandler<S> {
    config: TargetConfig,
    store: S,
}

impl<S: DocumentStore> RequestHandler<S> {
    /// Creates a new request handler.
    pub fn new(config: TargetConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles `GET /`.
    pub fn handle_db_info(&self) -> DbInfo {
        DbInfo::placeholder(self.config.db_name.as_str())
    }

    /// Handles `GET /_local[/...]`.
    ///
    /// Checkpoints are never persisted, so every lookup reports absence and
    /// the replicator starts from scratch.
    pub fn handle_get_local(&self, path: &str) -> TargetResult<Value> {
        Err(TargetError::DocNotFound(path.to_string()))
    }

    /// Handles `POST /_local[/...]`.
    pub fn handle_put_local(&self, _body: &Value) -> TargetResult<Value> {
        Err(TargetError::UnimplementedEndpoint)
    }

    /// Handles `GET /_changes`.
    ///
    /// The feed is always empty, whatever has been written.
    pub fn handle_changes(&self, _query: &QueryParams) -> ChangesFeed {
        ChangesFeed::empty()
    }

    /// Handles `GET /{id}`.
    pub fn handle_get_document(&self, id: &str) -> TargetResult<Document> {
        self.store
            .get(id)
            .ok_or_else(|| TargetError::DocNotFound(id.to_string()))
    }

    /// Handles `POST /_bulk_docs`.
    ///
    /// Stores the entries in order. The first failure aborts the remaining
    /// entries and is returned as is; documents stored before it stay stored.
    pub fn handle_bulk_docs(&self, body: Value) -> TargetResult<BulkDocsAck> {
        let request = BulkDocsRequest::from_body(body)?;
        let total = request.len();

        for (index, entry) in request.into_documents().enumerate() {
            let doc = Document::new(entry?);
            if let Err(e) = self.store.store(&doc) {
                warn!(
                    doc_id = doc.id().unwrap_or_default(),
                    index,
                    total,
                    error = %e,
                    "failed to store document, aborting bulk write"
                );
                return Err(e.into());
            }
        }

        debug!(count = total, "bulk write stored all documents");
        Ok(BulkDocsAck::default())
    }

    /// Handles `POST /_revs_diff`.
    pub fn handle_revs_diff(&self, body: &Value) -> TargetResult<RevsDiffResponse> {
        let request = RevsDiffRequest::from_body(body)?;
        let response = request.diff(|id, rev| self.store.exists(id, rev));
        debug!(missing_ids = response.len(), "computed revs_diff");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use couchlocal_store::{InMemoryDocumentStore, StoreError, StoreResult};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_handler() -> RequestHandler<InMemoryDocumentStore> {
        RequestHandler::new(TargetConfig::default(), InMemoryDocumentStore::new())
    }

    /// Store that fails on the n-th write.
    struct FailingStore {
        inner: InMemoryDocumentStore,
        fail_at: usize,
        writes: AtomicUsize,
    }

    impl DocumentStore for FailingStore {
        fn exists(&self, id: &str, rev: &str) -> bool {
            self.inner.exists(id, rev)
        }

        fn get(&self, id: &str) -> Option<Document> {
            self.inner.get(id)
        }

        fn store(&self, doc: &Document) -> StoreResult<()> {
            if self.writes.fetch_add(1, Ordering::SeqCst) == self.fail_at {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.store(doc)
        }
    }

    #[test]
    fn db_info_uses_configured_name() {
        let handler = RequestHandler::new(
            TargetConfig::new("outbox"),
            InMemoryDocumentStore::new(),
        );
        let info = handler.handle_db_info();
        assert_eq!(info.db_name, "outbox");
        assert_eq!(info.doc_count, 0);
    }

    #[test]
    fn local_is_never_found_and_never_written() {
        let handler = create_handler();
        assert!(matches!(
            handler.handle_get_local("/_local/abc"),
            Err(TargetError::DocNotFound(p)) if p == "/_local/abc"
        ));
        assert!(matches!(
            handler.handle_put_local(&json!({"last_seq": 5})),
            Err(TargetError::UnimplementedEndpoint)
        ));
    }

    #[test]
    fn bulk_docs_then_get() {
        let handler = create_handler();
        let ack = handler
            .handle_bulk_docs(json!({"docs": [
                {"_id": "a", "_rev": "1-x", "v": 1},
                {"_id": "b", "_rev": "1-y", "v": 2}
            ]}))
            .unwrap();
        assert_eq!(ack, BulkDocsAck::default());

        let a = handler.handle_get_document("a").unwrap();
        assert_eq!(a.into_value(), json!({"_id": "a", "_rev": "1-x", "v": 1}));
        assert!(matches!(
            handler.handle_get_document("c"),
            Err(TargetError::DocNotFound(id)) if id == "c"
        ));
    }

    #[test]
    fn bulk_docs_without_docs_is_malformed() {
        let handler = create_handler();
        assert!(matches!(
            handler.handle_bulk_docs(json!({"new_edits": false})),
            Err(TargetError::MalformedBulkRequest)
        ));
    }

    #[test]
    fn bulk_docs_aborts_at_first_store_failure() {
        let handler = RequestHandler::new(
            TargetConfig::default(),
            FailingStore {
                inner: InMemoryDocumentStore::new(),
                fail_at: 1,
                writes: AtomicUsize::new(0),
            },
        );

        let result = handler.handle_bulk_docs(json!({"docs": [
            {"_id": "a"}, {"_id": "b"}, {"_id": "c"}
        ]}));
        assert!(matches!(result, Err(TargetError::Store(StoreError::Io(_)))));

        assert!(handler.handle_get_document("a").is_ok());
        assert!(handler.handle_get_document("b").is_err());
        assert!(handler.handle_get_document("c").is_err());
    }

    #[test]
    fn bulk_docs_entry_without_id_is_fatal() {
        let handler = create_handler();
        let result = handler.handle_bulk_docs(json!({"docs": [{"_id": "a"}, {"v": 1}]}));
        assert!(matches!(result, Err(TargetError::Store(StoreError::MissingId))));
        assert!(handler.handle_get_document("a").is_ok());
    }

    #[test]
    fn bulk_docs_non_object_entry_is_fatal() {
        let handler = create_handler();
        let result = handler.handle_bulk_docs(json!({"docs": [{"_id": "a"}, "b", {"_id": "c"}]}));
        assert!(matches!(result, Err(TargetError::Fatal(_))));
        assert!(handler.handle_get_document("a").is_ok());
        assert!(handler.handle_get_document("c").is_err());
    }

    #[test]
    fn revs_diff_against_store() {
        let handler = create_handler();
        handler
            .handle_bulk_docs(json!({"docs": [{"_id": "doc1", "_rev": "1-abc"}]}))
            .unwrap();

        let response = handler
            .handle_revs_diff(&json!({"doc1": ["1-abc", "2-def"], "doc2": ["1-zzz"]}))
            .unwrap();
        assert_eq!(response.get("doc1"), Some(&["2-def".to_string()][..]));
        assert_eq!(response.get("doc2"), Some(&["1-zzz".to_string()][..]));
    }

    #[test]
    fn revs_diff_with_bad_body_is_fatal() {
        let handler = create_handler();
        assert!(matches!(
            handler.handle_revs_diff(&json!({"doc1": "1-abc"})),
            Err(TargetError::Fatal(_))
        ));
    }
}
