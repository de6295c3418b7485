//! Tolerant decoders for the display-only parts of backend records.
//!
//! Recipes are produced by a language model behind the backend, so the same field
//! can come back as a string, a number, `null` or a list. None of these should cost
//! the user the whole response.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Text shown as-is. `null` is empty, scalars use their JSON form, lists are joined.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(display_text(Value::deserialize(deserializer)?))
}

/// A list of display lines. A lone scalar becomes a one-element list.
pub(crate) fn text_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        other => vec![other],
    };
    Ok(items
        .into_iter()
        .map(display_text)
        .filter(|line| !line.is_empty())
        .collect())
}

/// A non-negative count, from a number or a numeric string.
pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A JSON object, key order preserved. Anything else is treated as absent.
pub(crate) fn object<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Map<String, Value>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

pub(crate) fn display_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(display_text)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
