//! `_revs_diff` request and response.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of `POST /_revs_diff`: document id to candidate revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevsDiffRequest {
    entries: Vec<(String, Vec<String>)>,
}

impl RevsDiffRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the candidate revisions of `id`.
    pub fn with(
        mut self,
        id: impl Into<String>,
        revs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.entries
            .push((id.into(), revs.into_iter().map(Into::into).collect()));
        self
    }

    /// Parses a request body of the form `{"id": ["rev", ...], ...}`.
    ///
    /// Ids keep the body's key order and revisions keep their array order.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidRevsDiff`] if the body is not an
    /// object, a value is not an array, or a revision is not a string.
    pub fn from_body(body: &Value) -> ProtocolResult<Self> {
        let Value::Object(body) = body else {
            return Err(ProtocolError::InvalidRevsDiff(
                "body is not an object".into(),
            ));
        };

        let mut entries = Vec::with_capacity(body.len());
        for (id, revs) in body {
            let Value::Array(revs) = revs else {
                return Err(ProtocolError::InvalidRevsDiff(format!(
                    "revisions of `{}` are not an array",
                    id
                )));
            };
            let revs = revs
                .iter()
                .enumerate()
                .map(|(i, rev)| {
                    rev.as_str().map(str::to_owned).ok_or_else(|| {
                        ProtocolError::InvalidRevsDiff(format!(
                            "revision {} of `{}` is not a string",
                            i, id
                        ))
                    })
                })
                .collect::<ProtocolResult<Vec<_>>>()?;
            entries.push((id.clone(), revs));
        }
        Ok(Self { entries })
    }

    /// Iterates over `(id, candidate revisions)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(id, revs)| (id.as_str(), revs.as_slice()))
    }

    /// Computes which candidates are missing according to `exists`.
    ///
    /// Every candidate is checked individually; an id appears in the
    /// response only if at least one of its candidates is missing.
    pub fn diff<F>(&self, mut exists: F) -> RevsDiffResponse
    where
        F: FnMut(&str, &str) -> bool,
    {
        let mut response = RevsDiffResponse::default();
        for (id, revs) in self.iter() {
            let missing: Vec<String> = revs
                .iter()
                .filter(|rev| !exists(id, rev))
                .cloned()
                .collect();
            response.insert(id, missing);
        }
        response
    }
}

/// Revisions a target does not have for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRevs {
    /// Missing revisions in request order.
    pub missing: Vec<String>,
}

/// Response of `POST /_revs_diff`: `{"id": {"missing": [...]}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevsDiffResponse {
    entries: BTreeMap<String, MissingRevs>,
}

impl RevsDiffResponse {
    /// Records the missing revisions of `id`.
    ///
    /// An empty `missing` list records nothing, so fully present ids never
    /// appear in the response.
    pub fn insert(&mut self, id: impl Into<String>, missing: Vec<String>) {
        if !missing.is_empty() {
            self.entries.insert(id.into(), MissingRevs { missing });
        }
    }

    /// Returns the missing revisions of `id`.
    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.entries.get(id).map(|m| m.missing.as_slice())
    }

    /// Returns the number of ids with missing revisions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is missing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn parse_keeps_revision_order() {
        let req = RevsDiffRequest::from_body(&json!({
            "doc1": ["2-def", "1-abc"],
            "doc2": []
        }))
        .unwrap();
        let entries: Vec<_> = req.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("doc1", &["2-def".to_string(), "1-abc".to_string()][..]));
        assert!(entries[1].1.is_empty());
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for body in [
            json!([]),
            json!("doc1"),
            json!({"doc1": "1-abc"}),
            json!({"doc1": ["1-abc", 2]}),
            json!({"doc1": [null]}),
        ] {
            assert!(matches!(
                RevsDiffRequest::from_body(&body),
                Err(ProtocolError::InvalidRevsDiff(_))
            ));
        }
    }

    #[test]
    fn diff_reports_only_missing() {
        let req = RevsDiffRequest::new().with("doc1", ["1-abc", "2-def"]);
        let response = req.diff(|id, rev| id == "doc1" && rev == "1-abc");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"doc1": {"missing": ["2-def"]}})
        );
    }

    #[test]
    fn diff_omits_satisfied_ids() {
        let req = RevsDiffRequest::new()
            .with("doc1", ["1-abc", "2-def"])
            .with("doc2", Vec::<String>::new());
        let response = req.diff(|_, _| true);
        assert!(response.is_empty());
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({}));
    }

    #[test]
    fn response_deserializes() {
        let response: RevsDiffResponse =
            serde_json::from_value(json!({"a": {"missing": ["1-x", "2-y"]}})).unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(response.get("a"), Some(&["1-x".to_string(), "2-y".to_string()][..]));
        assert!(response.get("b").is_none());
    }

    proptest! {
        #[test]
        fn diff_is_exact_complement(
            candidates in proptest::collection::btree_map(
                "[a-z]{1,6}",
                proptest::collection::vec("[0-9]-[a-f]{1,4}", 0..6),
                0..8,
            ),
            known_mask in proptest::collection::vec(any::<bool>(), 64),
        ) {
            let mut req = RevsDiffRequest::new();
            let mut known = HashSet::new();
            let mut n = 0;
            for (id, revs) in &candidates {
                for rev in revs {
                    if known_mask[n % known_mask.len()] {
                        known.insert((id.clone(), rev.clone()));
                    }
                    n += 1;
                }
                req = req.with(id.clone(), revs.clone());
            }

            let response = req.diff(|id, rev| known.contains(&(id.to_string(), rev.to_string())));

            for (id, revs) in &candidates {
                let expected: Vec<String> = revs
                    .iter()
                    .filter(|rev| !known.contains(&(id.clone(), (*rev).clone())))
                    .cloned()
                    .collect();
                if expected.is_empty() {
                    prop_assert!(response.get(id).is_none());
                } else {
                    prop_assert_eq!(response.get(id), Some(expected.as_slice()));
                }
            }
        }
    }
}
