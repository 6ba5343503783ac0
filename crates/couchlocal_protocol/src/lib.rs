//! # couchlocal Protocol
//!
//! CouchDB replication protocol types for the couchlocal replication target.
//!
//! This crate provides:
//! - The request envelope handed over by a transport ([`Request`], [`Method`], [`QueryParams`])
//! - Response shapes: [`DbInfo`], [`ChangesFeed`], [`BulkDocsAck`], [`RevsDiffResponse`]
//! - Body parsers for `_bulk_docs` and `_revs_diff`
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bulk_docs;
mod error;
mod info;
mod request;
mod revs_diff;

pub use bulk_docs::{BulkDocsAck, BulkDocsRequest};
pub use error::{ProtocolError, ProtocolResult};
pub use info::{ChangesFeed, DbInfo};
pub use request::{Method, QueryParams, Request};
pub use revs_diff::{MissingRevs, RevsDiffRequest, RevsDiffResponse};
