//! Parameter-map helpers shared by link generation code paths.

use serde_json::Value;

use crate::Params;

/// Render a parameter value into its URL text form: strings verbatim,
/// numbers and booleans in their canonical form, null empty. Structured
/// values fall back to their JSON text.
pub fn param_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build a percent-encoded query string (no leading `?`) from a parameter
/// map, in insertion order. Empty map yields an empty string.
pub fn query_string(params: &Params) -> String {
    params
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(&param_string(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Request-supplied values merged underneath statically-configured ones:
/// `overrides` wins on conflicting names, `base` order is kept for names
/// it already holds.
pub fn merge_params(base: &Params, overrides: &Params) -> Params {
    let mut merged = base.clone();
    for (name, value) in overrides {
        merged.insert(name.clone(), value.clone());
    }
    merged
}
