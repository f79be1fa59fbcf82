//! Identifier normalization for raw backend documents.

use serde_json::{Map, Value};

const NATIVE_ID: &str = "_id";
const GENERIC_ID: &str = "id";
const OBJECT_ID_KEY: &str = "$oid";

/// Rename every `_id` key to `id`, at every depth.
///
/// Objects nested inside objects or arrays are normalized the same way.
/// An extended-JSON object id (`{"$oid": "..."}`) under `_id` is flattened
/// to its string. A pre-existing `id` is overwritten by the native one.
/// Scalars are returned unchanged.
#[must_use]
pub fn normalize_ids(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_object(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_ids).collect()),
        scalar => scalar,
    }
}

fn normalize_object(map: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    let mut native = None;

    for (key, value) in map {
        if key == NATIVE_ID {
            native = Some(flatten_object_id(value));
        } else {
            out.insert(key, normalize_ids(value));
        }
    }

    if let Some(id) = native {
        out.insert(GENERIC_ID.to_string(), id);
    }
    out
}

fn flatten_object_id(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(OBJECT_ID_KEY) => {
            map.remove(OBJECT_ID_KEY).unwrap_or(Value::Null)
        }
        other => normalize_ids(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn contains_native_id(value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                map.contains_key(NATIVE_ID) || map.values().any(contains_native_id)
            }
            Value::Array(items) => items.iter().any(contains_native_id),
            _ => false,
        }
    }

    #[test]
    fn test_nested_variants() {
        let doc = json!({"_id": "x", "variants": [{"_id": "y"}]});
        let normalized = normalize_ids(doc);
        assert_eq!(normalized, json!({"id": "x", "variants": [{"id": "y"}]}));
        assert!(!contains_native_id(&normalized));
    }

    #[test]
    fn test_deeply_nested_and_arrays_of_documents() {
        let doc = json!([
            {"_id": "o1", "storeOrders": [{"_id": "so1", "items": [{"_id": "i1", "meta": {"_id": "m"}}]}]},
            {"_id": "o2"}
        ]);
        let normalized = normalize_ids(doc);
        assert!(!contains_native_id(&normalized));
        assert_eq!(normalized[0]["storeOrders"][0]["items"][0]["meta"]["id"], "m");
        assert_eq!(normalized[1]["id"], "o2");
    }

    #[test]
    fn test_object_id_is_flattened() {
        let normalized = normalize_ids(json!({"_id": {"$oid": "665f1c2ab"}, "name": "Mug"}));
        assert_eq!(normalized, json!({"id": "665f1c2ab", "name": "Mug"}));
    }

    #[test]
    fn test_native_id_wins_over_existing_id() {
        let normalized = normalize_ids(json!({"id": "stale", "_id": "fresh"}));
        assert_eq!(normalized, json!({"id": "fresh"}));
    }

    #[test]
    fn test_scalars_unchanged() {
        assert_eq!(normalize_ids(json!("x")), json!("x"));
        assert_eq!(normalize_ids(json!(null)), json!(null));
    }
}
