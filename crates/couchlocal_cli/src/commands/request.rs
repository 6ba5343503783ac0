//! Request command implementation.

use couchlocal_protocol::{Method, QueryParams, Request};
use couchlocal_store::{DocumentStore, FileDocumentStore};
use couchlocal_target::{ReplicationTarget, TargetConfig};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Runs a single request against the store at `store_path`.
///
/// The response body is printed as JSON. A failed request prints the
/// CouchDB error body and is returned as an error.
pub fn run(
    store_path: &Path,
    db_name: Option<String>,
    method: Method,
    request_path: &str,
    query: &[String],
    body: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = parse_query(query)?;
    let body = body.map(serde_json::from_str::<Value>).transpose()?;

    let config = match db_name {
        Some(name) => TargetConfig::default().with_db_name(name),
        None => TargetConfig::default(),
    };
    let store = FileDocumentStore::open_path(store_path)?;
    let target = ReplicationTarget::new(config, store);

    let request = Request {
        method,
        path: request_path.to_string(),
        query,
        body,
    };
    let (status, response) = respond(&target, request);
    debug!(status, "request complete");

    println!("{}", serde_json::to_string_pretty(&response)?);
    if status >= 400 {
        return Err(format!("request failed with status {}", status).into());
    }
    Ok(())
}

/// Runs `request` and returns the HTTP status and body a transport would send.
pub fn respond<S: DocumentStore>(target: &ReplicationTarget<S>, request: Request) -> (u16, Value) {
    match target.handle(request) {
        Ok(body) => (200, body),
        Err(e) => (e.status_code(), e.error_body()),
    }
}

/// Parses `name=value` pairs into query parameters.
pub fn parse_query(pairs: &[String]) -> Result<QueryParams, String> {
    let mut query = QueryParams::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Invalid query parameter (expected name=value): {}", pair))?;
        query
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }
    Ok(query)
}
