//! Query string serialization
//!
//! Builds `qs`-style query strings with encoding turned off. The back office
//! parses keys such as `filter[name]` literally, so brackets and every other
//! reserved character are written as-is, never percent-escaped.

use serde_json::{Map, Value};

/// Query parameters attached to a request
pub type Parameters = Map<String, Value>;

/// Serialize parameters into a query string.
///
/// Nested objects become `key[sub]=value`, arrays use indices
/// (`key[0]=a&key[1]=b`), `null` keeps the key with an empty value and empty
/// objects or arrays contribute nothing.
pub fn stringify(parameters: &Parameters) -> String {
    let mut pairs = Vec::new();

    for (key, value) in parameters {
        push_pairs(&mut pairs, key, value);
    }

    pairs.join("&")
}

fn push_pairs(pairs: &mut Vec<String>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                push_pairs(pairs, &format!("{}[{}]", prefix, key), nested);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                push_pairs(pairs, &format!("{}[{}]", prefix, index), nested);
            }
        }
        Value::Null => pairs.push(format!("{}=", prefix)),
        Value::String(s) => pairs.push(format!("{}={}", prefix, s)),
        // numbers and booleans render the same as their JSON form
        scalar => pairs.push(format!("{}={}", prefix, scalar)),
    }
}
