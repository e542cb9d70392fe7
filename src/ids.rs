//! Identifier assignment over the element tree.
//!
//! Every element gets a human-facing `id`, a document-unique `_id` built by
//! prefixing the parent `_id`, a `_parent_id` and a `_previous_id` linking it
//! to the sibling before it.
//!
//! `_id` is recomputed on every pass. `_parent_id` is only written when it is
//! missing or empty, so a re-run after ids changed keeps the stale parent link.
use crate::ident::{normalize, scalar_text};
use crate::quantifiers::apply_quantifiers;
use serde_json::{Map, Value};

pub const ID_KEY: &str = "id";
pub const UNIQUE_ID_KEY: &str = "_id";
pub const PARENT_ID_KEY: &str = "_parent_id";
pub const PREVIOUS_ID_KEY: &str = "_previous_id";

/// A nested element collection recognized by the assigner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildCollection {
    pub key: &'static str,
    pub prefix: &'static str,
    /// Entries carry WSJF quantifiers.
    pub quantified: bool,
}

pub const CHILD_COLLECTIONS: &[ChildCollection] = &[
    ChildCollection {
        key: "keyresults",
        prefix: "R",
        quantified: true,
    },
    ChildCollection {
        key: "deliverables",
        prefix: "D",
        quantified: true,
    },
    ChildCollection {
        key: "objectives",
        prefix: "O",
        quantified: false,
    },
    ChildCollection {
        key: "milestones",
        prefix: "M",
        quantified: false,
    },
    ChildCollection {
        key: "todos",
        prefix: "TODO",
        quantified: false,
    },
    ChildCollection {
        key: "timeline",
        prefix: "timeline",
        quantified: false,
    },
    ChildCollection {
        key: "releases",
        prefix: "Release",
        quantified: false,
    },
];

/// Look up the child collection entry for a key.
pub fn child_collection(key: &str) -> Option<&'static ChildCollection> {
    CHILD_COLLECTIONS.iter().find(|child| child.key == key)
}

/// Assign identifiers to a sibling collection and everything below it.
///
/// `prefix` builds ids for elements without one (`prefix` + 1-based index).
/// `parent_id` is the enclosing element's `_id`, or empty at the root scope.
/// Non-mapping entries are left alone but still consume an index.
pub fn assign_ids(elements: &mut [Value], prefix: &str, parent_id: &str) {
    let mut previous_id = String::new();
    for (offset, element) in elements.iter_mut().enumerate() {
        let Some(item) = element.as_object_mut() else {
            tracing::debug!(prefix, index = offset + 1, "skipping non-mapping element");
            continue;
        };
        previous_id = assign_element(item, offset + 1, prefix, parent_id, previous_id);
    }
}

/// Enrich one element and recurse into its children.
///
/// Returns the element's `_id`, which becomes the next sibling's previous id.
fn assign_element(
    item: &mut Map<String, Value>,
    index: usize,
    prefix: &str,
    parent_id: &str,
    previous_id: String,
) -> String {
    let id = match item.get(ID_KEY).and_then(id_text) {
        Some(id) if !id.is_empty() => id,
        _ => {
            let generated = format!("{prefix}{index}");
            item.insert(ID_KEY.to_string(), Value::String(generated.clone()));
            generated
        }
    };

    if is_blank(item.get(PARENT_ID_KEY)) {
        item.insert(
            PARENT_ID_KEY.to_string(),
            Value::String(normalize(parent_id)),
        );
    }

    let unique_id = if parent_id.is_empty() {
        normalize(&id)
    } else {
        format!("{parent_id}_{}", normalize(&id))
    };
    item.insert(UNIQUE_ID_KEY.to_string(), Value::String(unique_id.clone()));
    item.insert(PREVIOUS_ID_KEY.to_string(), Value::String(previous_id));

    for child in CHILD_COLLECTIONS {
        let Some(Value::Array(children)) = item.get_mut(child.key) else {
            continue;
        };
        assign_ids(children, child.prefix, &unique_id);
        if child.quantified {
            apply_quantifiers(children);
        }
    }

    unique_id
}

/// Text an existing `id` contributes to `_id`.
///
/// Non-empty sequences and mappings are kept as ids and rendered as JSON.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        scalar => scalar_text(scalar),
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
