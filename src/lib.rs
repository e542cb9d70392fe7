//! Enrichment and projection engine for hierarchical roadmap documents.
//!
//! The engine works on an already decoded document (`serde_json::Value`) and
//! returns it enriched in place: stable identifiers on every element, WSJF
//! prioritization scores, date groupings, removal of skipped items and a flat
//! path/value projection for tabular consumers.
//!
//! All operations are synchronous tree transforms without shared state, so
//! independent documents can be processed on separate threads freely.

pub mod enrich;
pub mod error;
pub mod flatten;
pub mod group;
pub mod ident;
pub mod ids;
pub mod prune;
pub mod quantifiers;

pub use enrich::{enrich_document, EnrichOptions, EnrichSummary};
pub use error::{EngineError, EngineResult};
pub use flatten::{filter_flat, flatten, FlatEntry};
pub use group::group_by_date;
pub use ident::normalize;
pub use ids::{assign_ids, ChildCollection, CHILD_COLLECTIONS};
pub use prune::{remove_path, PruneOutcome};
pub use quantifiers::{apply_quantifiers, cost_of_delay, weighted_shortest_job_first};
