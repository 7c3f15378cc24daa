//! Path-based value extraction from JSON
//!
//! Paths use '/' as separator (e.g. "/DescribeVolumesResponse/volumeSet/item").
//! When a path walks into an array, the remaining path is applied to every
//! element and the non-null results are collected.

use serde_json::Value;

/// Extract a value by path, or `Value::Null` when absent
pub fn extract_by_path(json: &Value, path: &str) -> Value {
    if path.is_empty() || path == "/" {
        return json.clone();
    }

    let parts: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    extract_by_parts(json, &parts)
}

fn extract_by_parts(json: &Value, parts: &[&str]) -> Value {
    let Some((part, remaining)) = parts.split_first() else {
        return json.clone();
    };

    match json {
        Value::Object(map) => match map.get(*part) {
            Some(value) => extract_by_parts(value, remaining),
            None => Value::Null,
        },
        Value::Array(arr) => {
            let mut results: Vec<Value> = arr
                .iter()
                .map(|item| extract_by_parts(item, parts))
                .filter(|v| !v.is_null())
                .collect();

            match results.len() {
                0 => Value::Null,
                1 => results.remove(0),
                _ => Value::Array(results),
            }
        }
        _ => Value::Null,
    }
}

/// Extract a list of items by path.
///
/// Always returns a Vec: a single decoded object becomes a one-element list
/// and a missing or empty set becomes an empty list.
pub fn extract_list(json: &Value, path: &str) -> Vec<Value> {
    match extract_by_path(json, path) {
        Value::Array(arr) => arr,
        Value::Null => vec![],
        other => vec![other],
    }
}

/// Extract a scalar as a string (`None` for null, objects and arrays)
pub fn extract_string(json: &Value, path: &str) -> Option<String> {
    match extract_by_path(json, path) {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
