//! Property-based test generators using proptest.
//!
//! Provides strategies for generating replication inputs that keep the
//! invariants the target relies on: non-internal document ids and opaque
//! revision tokens.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Strategy for document ids that never start with `_`.
///
/// Ids may carry characters that must be percent-encoded in a path, such as
/// `?`, `#`, `/`, `%` and spaces. Use [`doc_path`](crate::fixtures::doc_path)
/// to address them.
pub fn doc_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9][a-zA-Z0-9:._?#/% -]{0,23}").expect("Invalid regex")
}

/// Strategy for revision tokens in the usual `N-hash` form.
///
/// The target never parses them; the form only makes test output readable.
pub fn revision_strategy() -> impl Strategy<Value = String> {
    (1u32..50, prop::string::string_regex("[0-9a-f]{4,12}").expect("Invalid regex"))
        .prop_map(|(generation, hash)| format!("{}-{}", generation, hash))
}

/// Strategy for arbitrary JSON field values, nested up to two levels.
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("JSON has no NaN or infinity", |f| f.is_finite())
            .prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::from),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for a full document body carrying `_id` and `_rev`.
pub fn document_body_strategy() -> impl Strategy<Value = Value> {
    (
        doc_id_strategy(),
        revision_strategy(),
        prop::collection::btree_map("[a-z]{1,8}", field_value_strategy(), 0..5),
    )
        .prop_map(|(id, rev, fields)| {
            let mut body: Map<String, Value> = fields.into_iter().collect();
            body.insert("_id".into(), json!(id));
            body.insert("_rev".into(), json!(rev));
            Value::Object(body)
        })
}

/// Strategy for a batch of document bodies with distinct ids.
pub fn distinct_documents_strategy(max: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::btree_map(doc_id_strategy(), document_body_strategy(), 0..max).prop_map(
        |docs| {
            docs.into_iter()
                .map(|(id, mut body)| {
                    body["_id"] = json!(id);
                    body
                })
                .collect()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::doc_path;

    proptest! {
        #[test]
        fn generated_ids_are_not_internal(id in doc_id_strategy()) {
            prop_assert!(!id.starts_with('_'));
            prop_assert!(!doc_path(&id).contains(['?', '#', ' ']));
        }

        #[test]
        fn generated_documents_carry_id_and_rev(body in document_body_strategy()) {
            prop_assert!(body["_id"].is_string());
            prop_assert!(body["_rev"].is_string());
        }
    }
}
