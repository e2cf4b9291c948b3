//! Content hashing and canonical serialization.
//!
//! The hash is the standard IEEE CRC-32 (reflected polynomial `0xEDB88320`,
//! initial value all ones, final complement) over the UTF-8 bytes of its
//! input. Structured values are hashed through their canonical form: keys
//! sorted recursively, compact JSON, non-finite numbers as `null`.

use serde::Serialize;
use serde_json::Value;

/// CRC-32 of the UTF-8 bytes of `text`.
pub fn content_hash(text: &str) -> u32 {
    crc32fast::hash(text.as_bytes())
}

/// Recursively rebuild `value` with object keys in lexicographic order.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        _ => value.clone(),
    }
}

/// Compact, key-sorted JSON text for an already-built value.
pub fn canonical_string(value: &Value) -> String {
    sort_keys(value).to_string()
}

/// Serialize `value` and return its canonical JSON text.
///
/// # Errors
///
/// Returns the serializer error when `value` cannot be represented as JSON
/// (for example a map with non-string keys).
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let raw = serde_json::to_value(value)?;
    Ok(canonical_string(&raw))
}
