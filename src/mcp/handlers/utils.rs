//! Shared utility functions for MCP tool handlers.

use serde_json::Value;

/// First string argument found under any of `names` (camelCase first, then aliases).
pub(crate) fn str_arg<'a>(args: &'a Value, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| args.get(*name).and_then(|v| v.as_str()))
}

/// Positive integer argument. `Ok(None)` when absent or null, `Err` when
/// present but not a non-negative integer (numeric strings are accepted).
pub(crate) fn u64_arg(args: &Value, name: &str) -> Result<Option<u64>, String> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            .map(Some)
            .ok_or_else(|| format!("Invalid {}: expected a positive integer, got {}", name, v)),
    }
}

/// Pretty-printed JSON for tool text content.
pub(crate) fn json_to_string(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
