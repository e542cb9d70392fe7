//! Document enrichment pipeline.
//!
//! Runs the engine stages over a decoded roadmap in a fixed order: meta stamp,
//! identifier assignment with quantifiers, date grouping, removal of skipped
//! items, and finally the flat `as_list` projection. Decoding, validation and
//! rendering stay with the caller.
use crate::error::EngineError;
use crate::flatten::{entries_to_value, flatten};
use crate::group::{group_by_date, groups_to_value, DATE_KEY};
use crate::ids::{assign_ids, CHILD_COLLECTIONS};
use crate::prune::{normalize_path, remove_path, remove_segments};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};

mod options;

pub use options::{
    load_options, parse_skip_items, validate_options, EnrichOptions, RENDERTIME_FORMAT,
};

pub const META_KEY: &str = "meta";
pub const GROUP_KEY: &str = "group";
pub const AS_LIST_KEY: &str = "as_list";

/// A top-level collection of the roadmap document.
struct RootCollection {
    key: &'static str,
    prefix: &'static str,
    /// Key under `group` receiving the by-date buckets, if grouped.
    group_key: Option<&'static str>,
}

const ROOT_COLLECTIONS: [RootCollection; 4] = [
    RootCollection {
        key: "timeline",
        prefix: "Timeline",
        group_key: Some("timeline_by"),
    },
    RootCollection {
        key: "objectives",
        prefix: "O",
        group_key: Some("objectives_by"),
    },
    RootCollection {
        key: "milestones",
        prefix: "M",
        group_key: None,
    },
    RootCollection {
        key: "releases",
        prefix: "Release",
        group_key: None,
    },
];

/// Counts describing one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichSummary {
    /// Elements that received identifiers.
    pub elements: usize,
    /// Nodes deleted or nulled by skip items.
    pub pruned: usize,
    pub flat_entries: usize,
}

/// Enrich a decoded roadmap document in place.
///
/// Fails before any mutation when the root is not a mapping or a skip item is
/// invalid.
pub fn enrich_document(document: &mut Value, options: &EnrichOptions) -> Result<EnrichSummary> {
    validate_options(options)?;
    let mut summary = EnrichSummary::default();

    {
        let root = document
            .as_object_mut()
            .ok_or_else(|| EngineError::invalid("document root must be a mapping"))?;
        stamp_meta(root, options);
        summary.elements = assign_root_collections(root);
    }

    for item in &options.skip_items {
        let outcomes = remove_path(document, item)
            .with_context(|| format!("apply skip item {item:?}"))?;
        summary.pruned += outcomes.len();
        prune_grouped_copies(document, item);
    }

    let entries = flatten(document, None, options.keep_index);
    summary.flat_entries = entries.len();
    if let Some(root) = document.as_object_mut() {
        root.insert(AS_LIST_KEY.to_string(), entries_to_value(&entries));
    }

    tracing::info!(
        elements = summary.elements,
        pruned = summary.pruned,
        flat_entries = summary.flat_entries,
        "document enrichment complete"
    );
    Ok(summary)
}

fn stamp_meta(root: &mut Map<String, Value>, options: &EnrichOptions) {
    let rendertime = options.resolved_rendertime();
    tracing::info!(
        version = options.version.as_deref().unwrap_or("none"),
        rendertime = %rendertime,
        "stamping document meta"
    );
    root.insert(
        META_KEY.to_string(),
        json!({ "version": options.version, "rendertime": rendertime }),
    );
}

/// Assign identifiers to every top-level collection and fill `group`.
///
/// Returns the number of elements enriched.
fn assign_root_collections(root: &mut Map<String, Value>) -> usize {
    let mut groups = Map::new();
    for collection in &ROOT_COLLECTIONS {
        if let Some(group_key) = collection.group_key {
            groups.insert(group_key.to_string(), json!({ "date": null }));
        }
    }
    root.insert(GROUP_KEY.to_string(), Value::Object(groups.clone()));

    let mut elements = 0;
    for collection in &ROOT_COLLECTIONS {
        let items = match root.get_mut(collection.key) {
            Some(Value::Array(items)) => items,
            _ => {
                if let Some(group_key) = collection.group_key {
                    groups.shift_remove(group_key);
                }
                continue;
            }
        };
        assign_ids(items, collection.prefix, "");
        elements += count_elements(items);
        if let Some(group_key) = collection.group_key {
            let grouped = groups_to_value(group_by_date(Some(items.as_slice())));
            groups.insert(group_key.to_string(), json!({ "date": grouped }));
        }
    }

    root.insert(GROUP_KEY.to_string(), Value::Object(groups));
    elements
}

/// Replay a nested removal on the `group` buckets of its collection.
///
/// Buckets hold element copies taken before removal. Paths reaching below an
/// element's own attributes (three or more segments) are applied to every
/// copy; direct attributes of a grouped element stay in the buckets.
fn prune_grouped_copies(document: &mut Value, skip_item: &str) {
    let path = normalize_path(skip_item);
    let segments: Vec<&str> = path.split('.').collect();
    let [collection, tail @ ..] = segments.as_slice() else {
        return;
    };
    if tail.len() < 2 {
        return;
    }
    let Some(group_key) = ROOT_COLLECTIONS
        .iter()
        .find(|root| root.key == *collection)
        .and_then(|root| root.group_key)
    else {
        return;
    };
    let Some(Value::Object(buckets)) = document
        .get_mut(GROUP_KEY)
        .and_then(|group| group.get_mut(group_key))
        .and_then(|grouped| grouped.get_mut(DATE_KEY))
    else {
        return;
    };

    let mut pruned = 0;
    for entries in buckets.values_mut().filter_map(Value::as_array_mut) {
        for entry in entries.iter_mut() {
            pruned += remove_segments(entry, tail).len();
        }
    }
    tracing::debug!(path = %path, group = group_key, pruned, "pruned grouped copies");
}

fn count_elements(items: &[Value]) -> usize {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| {
            let nested: usize = CHILD_COLLECTIONS
                .iter()
                .filter_map(|child| item.get(child.key).and_then(Value::as_array))
                .map(Vec::as_slice)
                .map(count_elements)
                .sum();
            1 + nested
        })
        .sum()
}

#[cfg(test)]
#[path = "enrich_tests.rs"]
mod tests;
