//! Removal of subtrees and attributes addressed by dotted paths.
//!
//! A path such as `milestones.deliverables.todos` fans out over every entry of
//! each sequence it passes through. The final hop decides what happens to the
//! target key:
//! - reached from a sequence entry or the document root: the key is deleted,
//! - reached by descending through a single mapping: a scalar leaf is set to
//!   `null` and a nested container is deleted.
use crate::error::{EngineError, EngineResult};
use serde_json::{Map, Value};
use std::fmt;

/// Shortest accepted removal path after normalization (`logo`).
pub const MIN_PATH_CHARS: usize = 4;

/// What a removal did to one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    Delete(String),
    SetNull(String),
}

impl PruneOutcome {
    pub fn key(&self) -> &str {
        match self {
            PruneOutcome::Delete(key) | PruneOutcome::SetNull(key) => key,
        }
    }

    fn apply(&self, container: &mut Map<String, Value>) {
        match self {
            PruneOutcome::Delete(key) => {
                container.shift_remove(key);
            }
            PruneOutcome::SetNull(key) => {
                container.insert(key.clone(), Value::Null);
            }
        }
    }
}

impl fmt::Display for PruneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruneOutcome::Delete(key) => write!(f, "delete {key}"),
            PruneOutcome::SetNull(key) => write!(f, "set_null {key}"),
        }
    }
}

/// Normalize a removal path: strip all whitespace and lowercase it.
pub fn normalize_path(dotted_path: &str) -> String {
    dotted_path
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Check a removal path without touching any document.
pub fn validate_path(dotted_path: &str) -> EngineResult<String> {
    let path = normalize_path(dotted_path);
    if path.chars().count() < MIN_PATH_CHARS {
        return Err(EngineError::invalid(format!(
            "removal path {dotted_path:?} is shorter than {MIN_PATH_CHARS} characters"
        )));
    }
    Ok(path)
}

/// Remove the subtree or attribute addressed by `dotted_path`.
///
/// Missing intermediate keys are a silent no-op, so applying the same path
/// twice is safe. Returns every change made, in traversal order.
pub fn remove_path(document: &mut Value, dotted_path: &str) -> EngineResult<Vec<PruneOutcome>> {
    let path = validate_path(dotted_path)?;
    let segments: Vec<&str> = path.split('.').collect();
    let outcomes = remove_segments(document, &segments);
    for outcome in &outcomes {
        tracing::info!(path = %path, outcome = %outcome, "pruned document node");
    }
    Ok(outcomes)
}

/// Apply already normalized path segments to `data`.
///
/// Same traversal as [`remove_path`] without the length check, so a tail of
/// a validated path can be replayed on a single element.
pub fn remove_segments(data: &mut Value, segments: &[&str]) -> Vec<PruneOutcome> {
    let mut outcomes = Vec::new();
    prune(data, segments, &mut outcomes);
    outcomes
}

fn prune(data: &mut Value, segments: &[&str], outcomes: &mut Vec<PruneOutcome>) {
    if let Some(container) = data.as_object_mut() {
        prune_mapping(container, segments, outcomes);
    }
}

fn prune_mapping(
    container: &mut Map<String, Value>,
    segments: &[&str],
    outcomes: &mut Vec<PruneOutcome>,
) {
    let [head, rest @ ..] = segments else {
        return;
    };

    if rest.is_empty() {
        if container.contains_key(*head) {
            let outcome = PruneOutcome::Delete((*head).to_string());
            outcome.apply(container);
            outcomes.push(outcome);
        }
        return;
    }

    match container.get_mut(*head) {
        Some(Value::Array(items)) => {
            for item in items.iter_mut() {
                prune(item, rest, outcomes);
            }
        }
        Some(Value::Object(child)) => {
            if let [leaf] = rest {
                if let Some(outcome) = final_hop(child, leaf) {
                    outcome.apply(child);
                    outcomes.push(outcome);
                }
            } else {
                prune_mapping(child, rest, outcomes);
            }
        }
        _ => {}
    }
}

/// Pick the outcome for a key reached through a single mapping.
///
/// An already-null leaf needs no change.
fn final_hop(child: &Map<String, Value>, key: &str) -> Option<PruneOutcome> {
    match child.get(key)? {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(PruneOutcome::Delete(key.to_string())),
        _ => Some(PruneOutcome::SetNull(key.to_string())),
    }
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;
