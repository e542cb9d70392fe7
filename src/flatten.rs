//! Flat path/value projection of a document tree.
//!
//! Entry order follows document traversal order. Tabular exports rely on it,
//! so it must not change.
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One leaf of the flattened tree.
///
/// `path` is `None` only for a bare scalar flattened without any prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub path: Option<String>,
    pub value: Value,
}

impl FlatEntry {
    pub fn new(path: Option<String>, value: Value) -> Self {
        Self { path, value }
    }
}

/// Flatten `element` into dotted-path/value entries.
///
/// With `keep_index` the position of every mapping inside a sequence becomes
/// a path segment (`milestones.0.id`); otherwise sequence entries share their
/// parent's path. Non-mapping entries inside sequences are skipped.
pub fn flatten(element: &Value, prefix: Option<&str>, keep_index: bool) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    flatten_into(element, prefix, keep_index, &mut entries);
    entries
}

fn flatten_into(
    element: &Value,
    prefix: Option<&str>,
    keep_index: bool,
    entries: &mut Vec<FlatEntry>,
) {
    let prefix = dotted_prefix(prefix);
    match element {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if !item.is_object() {
                    continue;
                }
                let sub_prefix = if keep_index {
                    format!("{prefix}{index}")
                } else {
                    prefix.clone()
                };
                flatten_into(item, Some(&sub_prefix), keep_index, entries);
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                let sub_prefix = format!("{prefix}{key}");
                if is_container(value) {
                    flatten_into(value, Some(&sub_prefix), keep_index, entries);
                } else {
                    entries.push(FlatEntry::new(Some(sub_prefix), value.clone()));
                }
            }
        }
        scalar => {
            let path = prefix.strip_suffix('.').unwrap_or(&prefix);
            let path = (!path.is_empty()).then(|| path.to_string());
            entries.push(FlatEntry::new(path, scalar.clone()));
        }
    }
}

/// Prefix with a trailing dot, or empty when there is none yet.
fn dotted_prefix(prefix: Option<&str>) -> String {
    match prefix {
        None | Some("") => String::new(),
        Some(prefix) if prefix.ends_with('.') => prefix.to_string(),
        Some(prefix) => format!("{prefix}."),
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Keep the entries whose path matches any of the comma-separated keys.
///
/// Matching is exact with `precise`, substring otherwise. Results are grouped
/// per filter key in the order the keys are given; an entry matching several
/// keys appears once per key. Without `entries` the list is built from
/// `element` (non-indexed) under `prefix`.
pub fn filter_flat(
    entries: Option<&[FlatEntry]>,
    element: Option<&Value>,
    prefix: Option<&str>,
    filter_keys: &str,
    precise: bool,
) -> EngineResult<Vec<FlatEntry>> {
    let built;
    let entries = match (entries, element) {
        (Some(entries), _) => entries,
        (None, Some(element)) => {
            built = flatten(element, prefix, false);
            built.as_slice()
        }
        (None, None) => {
            return Err(EngineError::invalid(
                "neither a flat list nor a source element was supplied",
            ))
        }
    };

    let mut filtered = Vec::new();
    for filter_key in filter_keys.split(',').map(str::trim) {
        for entry in entries {
            let Some(path) = entry.path.as_deref() else {
                continue;
            };
            let matched = if precise {
                path == filter_key
            } else {
                path.contains(filter_key)
            };
            if matched {
                filtered.push(entry.clone());
            }
        }
    }
    Ok(filtered)
}

/// Render flat entries as a document sequence of `{path, value}` mappings.
pub fn entries_to_value(entries: &[FlatEntry]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|entry| {
                let mut map = serde_json::Map::new();
                map.insert(
                    "path".to_string(),
                    entry.path.clone().map_or(Value::Null, Value::String),
                );
                map.insert("value".to_string(), entry.value.clone());
                Value::Object(map)
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;
