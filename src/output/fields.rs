//! Field selection over JSON documents

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Requested field names
pub type FieldSet = BTreeSet<String>;

/// Parse a comma-separated field list
///
/// Entries are trimmed and empty entries dropped, so `" title, ,url "` yields
/// `{title, url}`.
pub fn parse_field_list(list: &str) -> FieldSet {
    list.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

fn project(object: Map<String, Value>, fields: &FieldSet) -> Map<String, Value> {
    object
        .into_iter()
        .filter(|(key, _)| fields.contains(key))
        .collect()
}

fn project_elements(items: Vec<Value>, fields: &FieldSet) -> Value {
    Value::Array(
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Value::Object(project(object, fields)),
                other => other,
            })
            .collect(),
    )
}

/// Keep only `fields` in `document`
///
/// - array: each object element is projected, other elements pass through
/// - object with a `results` array: the projected array is returned and the
///   envelope dropped
/// - any other object: its own keys are projected
///
/// An empty field set returns the document unchanged.
pub fn filter_fields(document: Value, fields: &FieldSet) -> Value {
    if fields.is_empty() {
        return document;
    }

    match document {
        Value::Array(items) => project_elements(items, fields),
        Value::Object(mut object) => match object.remove("results") {
            Some(Value::Array(results)) => project_elements(results, fields),
            Some(other) => {
                object.insert("results".to_string(), other);
                Value::Object(project(object, fields))
            }
            None => Value::Object(project(object, fields)),
        },
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_list() {
        let fields = parse_field_list(" title, ,url ,, ");
        assert_eq!(fields.len(), 2);
        assert!(fields.contains("title"));
        assert!(fields.contains("url"));
        assert!(parse_field_list("").is_empty());
    }

    #[test]
    fn test_plain_object() {
        let fields = parse_field_list("answer");
        let doc = json!({"answer": "Paris", "citations": [], "requestId": "r1"});
        assert_eq!(filter_fields(doc, &fields), json!({"answer": "Paris"}));
    }

    #[test]
    fn test_non_array_results_kept_as_key() {
        let fields = parse_field_list("results");
        let doc = json!({"results": "none", "other": 1});
        assert_eq!(filter_fields(doc, &fields), json!({"results": "none"}));
    }

    #[test]
    fn test_mixed_array() {
        let fields = parse_field_list("url");
        let doc = json!([{"url": "u1", "score": 0.5}, 7, "x"]);
        assert_eq!(filter_fields(doc, &fields), json!([{"url": "u1"}, 7, "x"]));
    }

    #[test]
    fn test_unknown_fields_yield_empty_objects() {
        let fields = parse_field_list("nope");
        let doc = json!([{"url": "u1"}]);
        assert_eq!(filter_fields(doc, &fields), json!([{}]));
    }
}
