//! Request envelope handed to the target by a transport.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Query parameters: name to every value supplied for it.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// HTTP method of a replication request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// A read.
    Get,
    /// A write or a query carrying a body.
    Post,
}

impl Method {
    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single replication request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Request method.
    pub method: Method,
    /// Database-relative path, always starting with `/`.
    pub path: String,
    /// Query parameters. No endpoint reads them today.
    pub query: QueryParams,
    /// Parsed JSON body, for POST requests.
    pub body: Option<Value>,
}

impl Request {
    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Creates a POST request carrying `body`.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: QueryParams::new(),
            body: Some(body),
        }
    }

    /// Adds one value for query parameter `name`.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(name.into()).or_default().push(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }

    #[test]
    fn request_builders() {
        let req = Request::get("/_changes")
            .with_query("since", "0")
            .with_query("style", "all_docs")
            .with_query("since", "1");
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.query["since"], vec!["0".to_string(), "1".to_string()]);
        assert!(req.body.is_none());

        let req = Request::post("/_bulk_docs", json!({"docs": []}));
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, Some(json!({"docs": []})));
    }
}
