//! Database info and changes feed responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `GET /`.
///
/// Only the shape matters to replicating clients. Every counter is a fixed
/// placeholder and never reflects store contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInfo {
    /// Database name.
    pub db_name: String,
    /// Placeholder, always 0.
    pub doc_count: u64,
    /// Placeholder, always 0.
    pub doc_del_count: u64,
    /// Placeholder, always 0.
    pub update_seq: u64,
    /// Placeholder, always 0.
    pub purge_seq: u64,
    /// Placeholder, always false.
    pub compact_running: bool,
    /// Placeholder, always 0.
    pub disk_size: u64,
    /// Placeholder, always 0.
    pub data_size: u64,
    /// Placeholder, always 0.
    pub instance_start_time: u64,
    /// Placeholder, always 0.
    pub disk_format_version: u64,
    /// Placeholder, always 0.
    pub committed_update_seq: u64,
}

impl DbInfo {
    /// Builds the placeholder info record for `db_name`.
    pub fn placeholder(db_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            doc_count: 0,
            doc_del_count: 0,
            update_seq: 0,
            purge_seq: 0,
            compact_running: false,
            disk_size: 0,
            data_size: 0,
            instance_start_time: 0,
            disk_format_version: 0,
            committed_update_seq: 0,
        }
    }
}

/// Response of `GET /_changes`.
///
/// The target does not track changes, so the feed it serves is always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangesFeed {
    /// Change rows.
    pub results: Vec<Value>,
    /// Sequence of the last change.
    pub last_seq: u64,
}

impl ChangesFeed {
    /// Returns the empty feed `{results: [], last_seq: 0}`.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            last_seq: 0,
        }
    }
}
