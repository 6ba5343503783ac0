//! `_bulk_docs` request and acknowledgement.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /_bulk_docs`: `{"docs": [ ... ]}`.
///
/// Entries are not validated up front. [`BulkDocsRequest::into_documents`]
/// yields them in order and reports a non-object entry only when it is
/// reached, so a caller storing as it goes has stored every preceding entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocsRequest {
    docs: Vec<Value>,
}

impl BulkDocsRequest {
    /// Extracts the `docs` array from a request body.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingDocs`] if the body is not an object,
    /// has no `docs` key, or `docs` is not an array.
    pub fn from_body(body: Value) -> ProtocolResult<Self> {
        let Value::Object(mut body) = body else {
            return Err(ProtocolError::MissingDocs);
        };
        match body.remove("docs") {
            Some(Value::Array(docs)) => Ok(Self { docs }),
            _ => Err(ProtocolError::MissingDocs),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if `docs` is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Yields each entry as a JSON object, in request order.
    pub fn into_documents(self) -> impl Iterator<Item = ProtocolResult<Map<String, Value>>> {
        self.docs
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(doc) => Ok(doc),
                _ => Err(ProtocolError::InvalidDocsEntry { index }),
            })
    }
}

/// Response of a fully successful `_bulk_docs`: the empty object `{}`.
///
/// There is no per-document status array. A bulk write either stores every
/// entry or fails as a whole at the first entry that cannot be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDocsAck {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_docs_array() {
        let req = BulkDocsRequest::from_body(json!({
            "docs": [{"id": "a", "rev": "1-x"}, {"id": "b", "rev": "1-y"}],
            "new_edits": false
        }))
        .unwrap();
        assert_eq!(req.len(), 2);

        let ids: Vec<_> = req
            .into_documents()
            .map(|doc| doc.unwrap()["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn empty_docs_array_is_valid() {
        let req = BulkDocsRequest::from_body(json!({"docs": []})).unwrap();
        assert!(req.is_empty());
    }

    #[test]
    fn missing_or_invalid_docs_is_rejected() {
        for body in [
            json!({}),
            json!({"documents": []}),
            json!({"docs": null}),
            json!({"docs": {"id": "a"}}),
            json!({"docs": "a"}),
            json!([{"id": "a"}]),
            Value::Null,
        ] {
            assert_eq!(
                BulkDocsRequest::from_body(body),
                Err(ProtocolError::MissingDocs)
            );
        }
    }

    #[test]
    fn non_object_entry_reported_in_place() {
        let req = BulkDocsRequest::from_body(json!({
            "docs": [{"id": "a"}, 42, {"id": "c"}]
        }))
        .unwrap();
        let results: Vec<_> = req.into_documents().collect();
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(ProtocolError::InvalidDocsEntry { index: 1 }));
        assert!(results[2].is_ok());
    }

    #[test]
    fn ack_is_empty_object() {
        assert_eq!(serde_json::to_value(BulkDocsAck::default()).unwrap(), json!({}));
    }
}
