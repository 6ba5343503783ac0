//! Path routing.
//!
//! Internal verbs match their exact path or any sub-path, so
//! `/_local/checkpoint-1` routes to `/_local`. Any other path starting with
//! `/_` is rejected; everything else names a document. Document ids are
//! percent-decoded, so `/org.couchdb.user%3Ax` names `org.couchdb.user:x`.

use crate::error::{TargetError, TargetResult};
use percent_encoding::percent_decode_str;

const LOCAL: &str = "/_local";
const CHANGES: &str = "/_changes";
const BULK_DOCS: &str = "/_bulk_docs";
const REVS_DIFF: &str = "/_revs_diff";

/// Destination of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: database info.
    Root,
    /// `/_local[/...]`: checkpoint documents. Holds the full path.
    Local(String),
    /// `/_changes[/...]`: changes feed.
    Changes,
    /// `/_bulk_docs[/...]`: bulk document write.
    BulkDocs,
    /// `/_revs_diff[/...]`: revision diff.
    RevsDiff,
    /// Any non-internal path. Holds the document id.
    Document(String),
}

impl Route {
    /// Resolves `path` to a route.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::UnsupportedInternalPath`] for a `/_` path that
    /// is not one of the recognized verbs, and [`TargetError::DocNotFound`]
    /// for a document path that does not decode to UTF-8.
    pub fn resolve(path: &str) -> TargetResult<Self> {
        if path == "/" {
            Ok(Route::Root)
        } else if matches(path, LOCAL) {
            Ok(Route::Local(path.to_string()))
        } else if matches(path, CHANGES) {
            Ok(Route::Changes)
        } else if matches(path, BULK_DOCS) {
            Ok(Route::BulkDocs)
        } else if matches(path, REVS_DIFF) {
            Ok(Route::RevsDiff)
        } else if path.starts_with("/_") {
            Err(TargetError::UnsupportedInternalPath(path.to_string()))
        } else {
            document_id(path).map(Route::Document)
        }
    }

    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Local(_) => "_local",
            Route::Changes => "_changes",
            Route::BulkDocs => "_bulk_docs",
            Route::RevsDiff => "_revs_diff",
            Route::Document(_) => "document",
        }
    }
}

fn matches(path: &str, verb: &str) -> bool {
    path.strip_prefix(verb)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Strips the leading slash and any query or fragment left on the path, then
/// percent-decodes what remains.
fn document_id(path: &str) -> TargetResult<String> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let raw = &path[..end];
    let raw = raw.strip_prefix('/').unwrap_or(raw);
    percent_decode_str(raw)
        .decode_utf8()
        .map(|id| id.into_owned())
        .map_err(|_| TargetError::DocNotFound(raw.to_string()))
}
