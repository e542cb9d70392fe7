mod common;

use roadmap_enrich::enrich::{AS_LIST_KEY, GROUP_KEY};
use roadmap_enrich::{enrich_document, filter_flat, flatten, EnrichOptions, FlatEntry};
use serde_json::{json, Value};
use std::collections::HashSet;

fn options() -> EnrichOptions {
    EnrichOptions::default()
        .with_version("2c1367e2")
        .with_rendertime("20240101120000")
}

fn collect_ids<'a>(value: &'a Value, ids: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            if let Some(id) = map.get("_id").and_then(Value::as_str) {
                ids.push(id);
            }
            for (key, child) in map {
                if key != GROUP_KEY && key != AS_LIST_KEY {
                    collect_ids(child, ids);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_ids(item, ids)),
        _ => {}
    }
}

#[test]
fn fixture_has_expected_preconditions() {
    let doc = common::roadmap();
    assert!(doc.get("milestones").is_some());
    assert!(doc.get("objectives").is_some());
    assert!(doc["milestones"][0]["deliverables"][0].get("todos").is_some());
    assert!(doc["objectives"][0]["keyresults"][0].get("quantifiers").is_some());
    let quantifiers = &doc["milestones"][0]["deliverables"][0]["quantifiers"];
    assert!(quantifiers["weighted_shortest_job_first"].is_null());
}

#[test]
fn enriched_fixture_has_unique_ids_everywhere() {
    common::init_tracing();
    let mut doc = common::roadmap();
    enrich_document(&mut doc, &options()).expect("enrich fixture");

    let mut ids = Vec::new();
    collect_ids(&doc, &mut ids);
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate _id in {ids:?}");
    assert!(unique.contains("m1_groesse_lieferung"));
    assert!(unique.contains("release1_m1"));
    assert!(unique.contains("m1"));
}

#[test]
fn enriched_fixture_scores_valid_quantifiers_only() {
    let mut doc = common::roadmap();
    enrich_document(&mut doc, &options()).expect("enrich fixture");

    let first = &doc["milestones"][0]["deliverables"][0]["quantifiers"];
    assert_eq!(first["cost_of_delay"], json!(3));
    assert_eq!(first["weighted_shortest_job_first"].as_f64(), Some(3.0));

    let second = &doc["milestones"][0]["deliverables"][1]["quantifiers"];
    assert_eq!(second["cost_of_delay"], json!(16));
    assert_eq!(second["weighted_shortest_job_first"].as_f64(), Some(5.33));

    let float_input = &doc["objectives"][0]["keyresults"][1]["quantifiers"];
    assert!(float_input["cost_of_delay"].is_null());
    assert!(float_input["weighted_shortest_job_first"].is_null());
}

#[test]
fn enriched_fixture_groups_timeline_by_date() {
    let mut doc = common::roadmap();
    enrich_document(&mut doc, &options()).expect("enrich fixture");

    let grouped = doc[GROUP_KEY]["timeline_by"]["date"]
        .as_object()
        .expect("timeline grouping");
    let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
    assert_eq!(keys, ["2024-01", "2024-03", "None"]);
    assert_eq!(grouped["2024-01"][0]["title"], "Kickoff");
    assert_eq!(grouped["2024-01"][1]["title"], "Design review");
}

#[test]
fn skip_items_prune_only_addressed_branches() {
    let mut doc = common::roadmap();
    let options = options().with_skip_items(
        "milestones.deliverables.todos, milestones.deliverables.quantifiers.jobsize",
    );
    enrich_document(&mut doc, &options).expect("enrich fixture");

    for milestone in doc["milestones"].as_array().expect("milestones") {
        for deliverable in milestone["deliverables"].as_array().expect("deliverables") {
            assert!(deliverable.get("todos").is_none());
        }
    }
    let quantifiers = &doc["milestones"][0]["deliverables"][0]["quantifiers"];
    assert!(quantifiers["jobsize"].is_null());
    assert_eq!(quantifiers["cost_of_delay"], json!(3));
    assert!(doc["objectives"][0]["keyresults"][0].get("todos").is_some());
}

#[test]
fn removing_milestones_keeps_objectives() {
    let mut doc = common::roadmap();
    enrich_document(&mut doc, &options().with_skip_items("milestones")).expect("enrich fixture");

    assert!(doc.get("milestones").is_none());
    assert!(doc.get("objectives").is_some());
    let as_list = doc[AS_LIST_KEY].as_array().expect("as_list");
    assert!(as_list
        .iter()
        .all(|entry| !entry["path"].as_str().unwrap_or_default().starts_with("milestones")));
}

#[test]
fn flat_projection_of_fixture_supports_tabular_filtering() {
    let doc = common::roadmap();
    let entries = flatten(&doc, None, false);
    assert_eq!(
        entries[0],
        FlatEntry::new(Some("title".to_string()), json!("Roadmap integration fixture"))
    );
    assert_eq!(entries[1].path.as_deref(), Some("description"));

    let titles = filter_flat(Some(entries.as_slice()), None, None, "milestones.title", true)
        .expect("filter milestones");
    let values: Vec<&Value> = titles.iter().map(|entry| &entry.value).collect();
    assert_eq!(values, [&json!("Milestone 1 - title"), &json!("Milestone 2 - title")]);

    let todos = filter_flat(None, Some(&doc), None, ".todos.", false).expect("filter todos");
    assert_eq!(todos.len(), 6);
}

#[test]
fn flat_projection_with_index_starts_at_first_milestone() {
    let doc = common::roadmap();
    let entries = flatten(&doc["milestones"], Some("milestones"), true);
    assert_eq!(entries[0].path.as_deref(), Some("milestones.0.id"));
    assert_eq!(entries[0].value, json!("M1"));
}

#[test]
fn documents_enrich_independently_on_separate_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                let mut doc = common::roadmap();
                enrich_document(&mut doc, &options()).expect("enrich fixture");
                doc
            })
        })
        .collect();
    let results: Vec<Value> = handles
        .into_iter()
        .map(|handle| handle.join().expect("enrichment thread"))
        .collect();
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
}
