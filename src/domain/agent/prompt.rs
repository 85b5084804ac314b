//! Shared rendering helpers for user prompts.
//!
//! Builders use these so every agent renders open maps, histories and
//! absent values the same way.

use serde_json::{Map, Value};

/// Substitute for an absent optional scalar.
pub const UNSPECIFIED: &str = "unspecified";

/// Substitute for an absent or empty collection.
pub const NONE_PROVIDED: &str = "None provided";

/// Open key/value context supplied by callers.
pub type ContextMap = Map<String, Value>;

/// Renders a value without JSON quoting for plain strings.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => UNSPECIFIED.to_string(),
        other => other.to_string(),
    }
}

/// Renders a map as `key: value` lines sorted by key.
pub fn render_map(map: &ContextMap) -> String {
    if map.is_empty() {
        return NONE_PROVIDED.to_string();
    }

    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys.iter()
        .map(|key| format!("{}: {}", key, render_value(&map[key.as_str()])))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders items as a numbered list starting at 1.
pub fn render_numbered(items: &[String]) -> String {
    if items.is_empty() {
        return NONE_PROVIDED.to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the trimmed text, or [`UNSPECIFIED`] when absent or blank.
pub fn or_unspecified(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => UNSPECIFIED,
    }
}
