//! Response reshaping tests

use exa_cli::output::{filter_fields, parse_field_list, reshape, FieldSet, JqFilter};
use exa_cli::AppError;
use serde_json::{json, Value};

/// Two-result search envelope
fn search_envelope() -> Value {
    json!({
        "requestId": "req-1",
        "results": [
            {"title": "A", "url": "u1", "score": 0.9},
            {"title": "B", "url": "u2", "score": 0.8}
        ],
        "costDollars": {"total": 0.005}
    })
}

#[test]
fn test_field_selection_over_envelope() {
    let values = reshape(search_envelope(), &parse_field_list("title,url"), None).unwrap();
    assert_eq!(
        values,
        vec![json!([{"title": "A", "url": "u1"}, {"title": "B", "url": "u2"}])]
    );
}

#[test]
fn test_envelope_equals_bare_array() {
    let fields = parse_field_list("url, score");
    let bare = search_envelope()["results"].clone();

    assert_eq!(
        filter_fields(search_envelope(), &fields),
        filter_fields(bare, &fields)
    );
}

#[test]
fn test_empty_field_list_is_identity() {
    let doc = search_envelope();
    assert_eq!(filter_fields(doc.clone(), &FieldSet::new()), doc);
    assert_eq!(reshape(doc.clone(), &parse_field_list(" , "), None).unwrap(), vec![doc]);
}

#[test]
fn test_selection_is_intersection() {
    let fields = parse_field_list("title,missing");
    let values = reshape(json!([{"title": "A", "url": "u1"}, {"url": "u2"}]), &fields, None).unwrap();
    assert_eq!(values, vec![json!([{"title": "A"}, {}])]);
}

#[test]
fn test_filter_runs_after_selection() {
    let values = reshape(search_envelope(), &parse_field_list("url"), Some(".[].url")).unwrap();
    assert_eq!(values, vec![json!("u1"), json!("u2")]);
}

#[test]
fn test_filter_on_full_document() {
    let values = reshape(search_envelope(), &FieldSet::new(), Some(".costDollars.total")).unwrap();
    assert_eq!(values, vec![json!(0.005)]);

    let values = reshape(search_envelope(), &FieldSet::new(), Some("[.results[] | select(.score > 0.85) | .title]")).unwrap();
    assert_eq!(values, vec![json!(["A"])]);
}

#[test]
fn test_filter_with_no_outputs() {
    let values = reshape(search_envelope(), &FieldSet::new(), Some(".results[] | select(.score > 1)")).unwrap();
    assert!(values.is_empty());
}

#[test]
fn test_invalid_expression() {
    let result = reshape(search_envelope(), &FieldSet::new(), Some(".results[ | ."));
    assert!(matches!(result, Err(AppError::Filter(_))));
}

#[test]
fn test_runtime_error_stops_emission() {
    let filter = JqFilter::compile(".results[0] | .title, (.score / .title)").unwrap();
    let mut seen = Vec::new();
    let result = filter.for_each(search_envelope(), |value| {
        seen.push(value);
        Ok(())
    });

    assert!(matches!(result, Err(AppError::Filter(_))));
    assert_eq!(seen, vec![json!("A")]);
}
