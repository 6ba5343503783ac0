//! The replication target entry point.

use crate::config::TargetConfig;
use crate::error::{TargetError, TargetResult};
use crate::handler::RequestHandler;
use crate::router::Route;
use couchlocal_protocol::{Method, QueryParams, Request};
use couchlocal_store::DocumentStore;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// A local CouchDB replication target.
///
/// The target answers the replication subset of the CouchDB HTTP API from a
/// [`DocumentStore`]. It has no listener of its own: a transport feeds it
/// `(method, path, query, body)` and serializes whatever comes back. Errors
/// are returned untouched; [`TargetError::status_code`] and
/// [`TargetError::error_body`] give the transport what it needs to answer.
///
/// # Example
///
/// ```
/// use couchlocal_target::{ReplicationTarget, TargetConfig};
/// use couchlocal_store::InMemoryDocumentStore;
/// use couchlocal_protocol::QueryParams;
/// use serde_json::json;
///
/// let target = ReplicationTarget::new(TargetConfig::default(), InMemoryDocumentStore::new());
/// let query = QueryParams::new();
///
/// target
///     .post("/_bulk_docs", &query, json!({"docs": [{"_id": "a", "_rev": "1-x"}]}))
///     .unwrap();
/// let doc = target.get("/a", &query).unwrap();
/// assert_eq!(doc, json!({"_id": "a", "_rev": "1-x"}));
/// ```
pub struct ReplicationTarget<S> {
    handler: RequestHandler<S>,
}

impl<S: DocumentStore> ReplicationTarget<S> {
    /// Creates a target backed by `store`.
    pub fn new(config: TargetConfig, store: S) -> Self {
        Self {
            handler: RequestHandler::new(config, store),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TargetConfig {
        self.handler.config()
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        self.handler.store()
    }

    /// Handles a GET request.
    pub fn get(&self, path: &str, query: &QueryParams) -> TargetResult<Value> {
        let route = Route::resolve(path)?;
        debug!(method = "GET", path, route = route.name(), "dispatching request");

        match route {
            Route::Root => to_json(self.handler.handle_db_info()),
            Route::Local(path) => self.handler.handle_get_local(&path),
            Route::Changes => to_json(self.handler.handle_changes(query)),
            Route::Document(id) => self.handler.handle_get_document(&id).map(Value::from),
            Route::BulkDocs | Route::RevsDiff => {
                Err(TargetError::UnsupportedInternalPath(path.to_string()))
            }
        }
    }

    /// Handles a POST request.
    pub fn post(&self, path: &str, _query: &QueryParams, body: Value) -> TargetResult<Value> {
        let route = Route::resolve(path)?;
        debug!(method = "POST", path, route = route.name(), "dispatching request");

        match route {
            Route::Local(_) => self.handler.handle_put_local(&body),
            Route::BulkDocs => to_json(self.handler.handle_bulk_docs(body)?),
            Route::RevsDiff => to_json(self.handler.handle_revs_diff(&body)?),
            Route::Changes => Err(TargetError::UnsupportedInternalPath(path.to_string())),
            Route::Root | Route::Document(_) => Err(TargetError::Fatal(format!(
                "writing to {} is not implemented",
                path
            ))),
        }
    }

    /// Handles a request envelope.
    ///
    /// A POST without a body is handled as if the body were `{}`.
    pub fn handle(&self, request: Request) -> TargetResult<Value> {
        let result = match request.method {
            Method::Get => self.get(&request.path, &request.query),
            Method::Post => {
                let body = request.body.unwrap_or_else(|| Value::Object(Map::new()));
                self.post(&request.path, &request.query, body)
            }
        };
        if let Err(e) = &result {
            debug!(
                method = %request.method,
                path = %request.path,
                status = e.status_code(),
                error = %e,
                "request failed"
            );
        }
        result
    }
}

fn to_json<T: Serialize>(value: T) -> TargetResult<Value> {
    serde_json::to_value(value).map_err(|e| TargetError::Fatal(e.to_string()))
}
