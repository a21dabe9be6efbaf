//! Deserialization helpers for portal fields whose JSON type drifts between
//! endpoints (years and timestamps arrive as numbers on some pages and strings
//! on others).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Renders a scalar JSON value as the string a user would see.
///
/// `null` becomes `None`; strings are returned without quotes.
pub fn to_display_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Accepts a string, number or null and yields an optional string.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_display_string))
}
