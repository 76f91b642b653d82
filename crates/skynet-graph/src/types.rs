use std::collections::HashMap;

use serde_json::Value;

/// A node's properties as they arrive from a caller (upsert args, extracted
/// facts). Values are JSON so callers can build them without a neo4rs
/// dependency; `to_query_params` applies the storage rule before binding.
pub type PropertyMap = HashMap<String, Value>;

/// Storage rule (§4.4): properties are scalars or scalar arrays. Nested
/// maps, or arrays containing anything but scalars, are JSON-stringified at
/// the edge rather than rejected.
pub fn normalize_property(value: &Value) -> Value {
    match value {
        Value::Object(_) => Value::String(value.to_string()),
        Value::Array(items) => {
            if items.iter().all(|v| !matches!(v, Value::Object(_) | Value::Array(_))) {
                value.clone()
            } else {
                Value::Array(
                    items
                        .iter()
                        .map(|v| Value::String(v.to_string()))
                        .collect(),
                )
            }
        }
        other => other.clone(),
    }
}

pub fn normalize_properties(props: &PropertyMap) -> PropertyMap {
    props
        .iter()
        .map(|(k, v)| (k.clone(), normalize_property(v)))
        .collect()
}

/// A plain record row returned from a Cypher query, already detached from
/// the driver's row type.
pub type Row = HashMap<String, Value>;

#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

#[derive(Debug, Clone)]
pub struct EdgeRecord {
    pub rel_type: String,
    pub start: String,
    pub end: String,
    pub properties: PropertyMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_values_pass_through() {
        assert_eq!(normalize_property(&json!("abc")), json!("abc"));
        assert_eq!(normalize_property(&json!(42)), json!(42));
    }

    #[test]
    fn scalar_array_passes_through() {
        let v = json!(["a", "b", "c"]);
        assert_eq!(normalize_property(&v), v);
    }

    #[test]
    fn nested_object_is_stringified() {
        let v = json!({"a": 1});
        let out = normalize_property(&v);
        assert!(matches!(out, Value::String(_)));
    }

    #[test]
    fn array_of_objects_becomes_array_of_strings() {
        let v = json!([{"a": 1}, {"b": 2}]);
        let out = normalize_property(&v);
        match out {
            Value::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(|i| matches!(i, Value::String(_))));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }
}
