//! Query fingerprints used as cache keys.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Rebuilds a JSON value with every object's keys in sorted order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

// == Fingerprint ==
/// Stable SHA-256 hex key of a query.
///
/// Structured queries are serialized with sorted keys first, so field order
/// never changes the key. A plain string is hashed as its raw text.
pub fn fingerprint<T: Serialize + ?Sized>(query: &T) -> Result<String> {
    let value = serde_json::to_value(query)?;
    let text = match &value {
        Value::String(raw) => raw.clone(),
        other => serde_json::to_string(&canonicalize(other))?,
    };
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"a": 1, "b": {"y": 2, "x": [3, {"q": 1, "p": 2}]}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b": {"x": [3, {"p": 2, "q": 1}], "y": 2}, "a": 1}"#).unwrap();
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn test_different_values_differ() {
        let a = fingerprint(&json!({"count": 5})).unwrap();
        let b = fingerprint(&json!({"count": 6})).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_string_hashes_raw_text() {
        let key = fingerprint("hello").unwrap();
        assert_eq!(
            key,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_array_order_is_significant() {
        assert_ne!(
            fingerprint(&json!(["vegan", "no_spicy"])).unwrap(),
            fingerprint(&json!(["no_spicy", "vegan"])).unwrap()
        );
    }
}
