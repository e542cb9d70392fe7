//! Stable grouping of sibling elements by date.
use crate::ident::scalar_text;
use indexmap::IndexMap;
use serde_json::{Map, Value};

pub const DATE_KEY: &str = "date";
/// Bucket for elements without a usable date.
pub const NO_DATE_BUCKET: &str = "None";

/// Group elements by their `date` attribute in one left-to-right pass.
///
/// Buckets keep first-occurrence order and elements keep their relative
/// order inside a bucket. Stored elements are copies of the source entries.
pub fn group_by_date(elements: Option<&[Value]>) -> IndexMap<String, Vec<Value>> {
    let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
    for element in elements.unwrap_or_default() {
        groups
            .entry(date_bucket(element))
            .or_default()
            .push(element.clone());
    }
    groups
}

/// Convert grouped buckets into a document mapping.
pub fn groups_to_value(groups: IndexMap<String, Vec<Value>>) -> Value {
    let map: Map<String, Value> = groups
        .into_iter()
        .map(|(date, items)| (date, Value::Array(items)))
        .collect();
    Value::Object(map)
}

fn date_bucket(element: &Value) -> String {
    element
        .get(DATE_KEY)
        .and_then(scalar_text)
        .unwrap_or_else(|| NO_DATE_BUCKET.to_string())
}
