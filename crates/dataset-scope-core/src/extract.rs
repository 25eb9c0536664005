//! Function-name extraction from decoded payloads.
//!
//! Two shapes are recognized:
//! - a mapping with a `function` mapping and/or a `functions` sequence,
//! - a sequence whose elements are either `{"function": {...}}` wrappers or bare
//!   `{"name": ...}` mappings.
//!
//! Anything that does not fit contributes no names. A `name` that is not a string
//! is treated as absent.

use serde_json::{Map, Value};

use crate::payload::DecodedPayload;

pub fn extract_function_names(payload: &DecodedPayload) -> Vec<String> {
    match payload {
        DecodedPayload::Mapping(map) => names_from_mapping(map),
        DecodedPayload::Sequence(items) => names_from_sequence(items),
        DecodedPayload::Scalar(_) | DecodedPayload::Unparseable => Vec::new(),
    }
}

fn names_from_mapping(map: &Map<String, Value>) -> Vec<String> {
    let mut names = Vec::new();

    if let Some(Value::Object(function)) = map.get("function") {
        names.extend(name_of(function));
    }

    if let Some(Value::Array(functions)) = map.get("functions") {
        names.extend(
            functions
                .iter()
                .filter_map(Value::as_object)
                .filter_map(name_of),
        );
    }

    names
}

fn names_from_sequence(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|element| {
            let source = match element.get("function") {
                Some(Value::Object(function)) => function,
                _ => element,
            };
            name_of(source)
        })
        .collect()
}

fn name_of(map: &Map<String, Value>) -> Option<String> {
    map.get("name").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(value: Value) -> Vec<String> {
        extract_function_names(&DecodedPayload::from(value))
    }

    #[test]
    fn test_singular_function() {
        assert_eq!(extract(json!({"function": {"name": "f"}})), vec!["f"]);
    }

    #[test]
    fn test_plural_functions_preserve_order() {
        assert_eq!(
            extract(json!({"functions": [{"name": "a"}, {"name": "b"}]})),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_singular_and_plural_concatenate() {
        let value = json!({
            "function": {"name": "first"},
            "functions": [{"name": "second"}, {"name": "first"}]
        });
        assert_eq!(extract(value), vec!["first", "second", "first"]);
    }

    #[test]
    fn test_plural_skips_non_mapping_elements() {
        let value = json!({"functions": ["a", 1, null, {"name": "b"}, {"title": "c"}]});
        assert_eq!(extract(value), vec!["b"]);
    }

    #[test]
    fn test_sequence_of_wrappers_and_bare_names() {
        let value = json!([{"function": {"name": "a"}}, {"name": "b"}]);
        assert_eq!(extract(value), vec!["a", "b"]);
    }

    #[test]
    fn test_sequence_non_mapping_function_falls_back_to_element() {
        let value = json!([{"function": "a", "name": "b"}, {"function": {"id": 1}, "name": "c"}]);
        // A non-mapping `function` falls back to the element itself; a mapping
        // without a name does not.
        assert_eq!(extract(value), vec!["b"]);
    }

    #[test]
    fn test_sequence_skips_scalars() {
        assert_eq!(extract(json!(["a", 1, [{"name": "nested"}]])), Vec::<String>::new());
    }

    #[test]
    fn test_non_string_name_is_ignored() {
        assert!(extract(json!({"function": {"name": 7}})).is_empty());
        assert!(extract(json!({"functions": [{"name": null}, {"name": ["x"]}]})).is_empty());
        assert!(extract(json!([{"name": false}])).is_empty());
    }

    #[test]
    fn test_wrong_container_types() {
        assert!(extract(json!({"function": [{"name": "f"}]})).is_empty());
        assert!(extract(json!({"functions": {"name": "f"}})).is_empty());
        assert!(extract(json!({"role": "user", "content": "hi"})).is_empty());
    }

    #[test]
    fn test_mapping_top_level_name_is_not_a_call() {
        assert!(extract(json!({"name": "f"})).is_empty());
    }

    #[test]
    fn test_scalar_and_unparseable() {
        assert!(extract(json!("f")).is_empty());
        assert!(extract_function_names(&DecodedPayload::Unparseable).is_empty());
    }
}
