//! Opaque JSON documents.

use crate::error::{StoreError, StoreResult};
use serde_json::{Map, Value};

/// Field names consulted, in order, for a document's id.
pub const ID_FIELDS: [&str; 2] = ["_id", "id"];

/// Field names consulted, in order, for a document's revision.
pub const REV_FIELDS: [&str; 2] = ["_rev", "rev"];

/// A stored document.
///
/// The body is kept exactly as received: reading the id and revision never
/// rewrites or strips fields, so a body fetched back from a store is equal
/// to the body that was stored.
///
/// Revision tokens are opaque. They are compared for equality and never
/// parsed or ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    body: Map<String, Value>,
}

impl Document {
    /// Wraps a JSON object body.
    pub fn new(body: Map<String, Value>) -> Self {
        Self { body }
    }

    /// Converts a JSON value into a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotAnObject`] if `value` is not an object.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// Returns the document id, if the body carries one.
    pub fn id(&self) -> Option<&str> {
        self.text_field(&ID_FIELDS)
    }

    /// Returns the document revision, if the body carries one.
    pub fn rev(&self) -> Option<&str> {
        self.text_field(&REV_FIELDS)
    }

    /// Returns the document id or [`StoreError::MissingId`].
    pub fn require_id(&self) -> StoreResult<&str> {
        self.id().ok_or(StoreError::MissingId)
    }

    /// Returns the body.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Consumes the document and returns its body as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    fn text_field(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .find_map(|name| self.body.get(*name).and_then(Value::as_str))
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn underscore_fields_take_precedence() {
        let doc = Document::from_value(json!({
            "_id": "a", "id": "b", "_rev": "2-y", "rev": "1-x"
        }))
        .unwrap();
        assert_eq!(doc.id(), Some("a"));
        assert_eq!(doc.rev(), Some("2-y"));
    }

    #[test]
    fn plain_fields_are_fallbacks() {
        let doc = Document::from_value(json!({"id": "a", "rev": "1-x"})).unwrap();
        assert_eq!(doc.id(), Some("a"));
        assert_eq!(doc.rev(), Some("1-x"));
    }

    #[test]
    fn non_string_id_is_ignored() {
        let doc = Document::from_value(json!({"_id": 7, "id": "seven"})).unwrap();
        assert_eq!(doc.id(), Some("seven"));

        let doc = Document::from_value(json!({"_id": 7})).unwrap();
        assert!(matches!(doc.require_id(), Err(StoreError::MissingId)));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            Document::from_value(json!(["a"])),
            Err(StoreError::NotAnObject)
        ));
        assert!(matches!(
            Document::from_value(json!("a")),
            Err(StoreError::NotAnObject)
        ));
    }

    #[test]
    fn body_round_trips_unchanged() {
        let value = json!({"_id": "a", "_rev": "1-x", "nested": {"k": [1, 2, null]}});
        let doc = Document::from_value(value.clone()).unwrap();
        assert_eq!(doc.into_value(), value);
    }
}
