//! # couchlocal Testkit
//!
//! Test utilities for couchlocal.
//!
//! This crate provides:
//! - Fixtures: targets over in-memory or temporary file stores
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use couchlocal_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_target() {
//!     let target = memory_target();
//!     target.handle(Request::get("/")).unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use couchlocal_protocol::{QueryParams, Request};
    pub use couchlocal_target::{ReplicationTarget, TargetConfig, TargetError};
}

pub use fixtures::*;
pub use generators::*;
