//! Enrichment options.
//!
//! Options arrive already decoded (JSON text or a comma-separated skip list)
//! and are validated up front so a bad removal path never leaves a document
//! half-enriched.
use crate::prune::validate_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Timestamp layout stamped at `meta.rendertime`.
pub const RENDERTIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Caller-supplied knobs for one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrichOptions {
    /// Removal paths, applied in order after identifiers are assigned.
    pub skip_items: Vec<String>,
    /// Document version computed by the caller (content checksum).
    pub version: Option<String>,
    /// Fixed render time; the current local time is used when absent.
    pub rendertime: Option<String>,
    /// Keep sequence positions in `as_list` paths.
    pub keep_index: bool,
}

impl EnrichOptions {
    /// Replace the skip list with entries parsed from a comma-separated string.
    pub fn with_skip_items(mut self, csv: &str) -> Self {
        self.skip_items = parse_skip_items(csv);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_rendertime(mut self, rendertime: impl Into<String>) -> Self {
        self.rendertime = Some(rendertime.into());
        self
    }

    /// Render time to stamp, formatted with [`RENDERTIME_FORMAT`].
    pub fn resolved_rendertime(&self) -> String {
        match self.rendertime.as_deref() {
            Some(rendertime) => rendertime.to_string(),
            None => chrono::Local::now().format(RENDERTIME_FORMAT).to_string(),
        }
    }
}

/// Split a comma-separated skip list, ignoring whitespace and empty entries.
pub fn parse_skip_items(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(|item| item.chars().filter(|ch| !ch.is_whitespace()).collect::<String>())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse options from JSON text.
pub fn load_options(text: &str) -> Result<EnrichOptions> {
    let options: EnrichOptions =
        serde_json::from_str(text).context("parse enrich options JSON")?;
    Ok(options)
}

/// Reject options that would fail part-way through enrichment.
pub fn validate_options(options: &EnrichOptions) -> Result<()> {
    for item in &options.skip_items {
        validate_path(item).with_context(|| format!("validate skip item {item:?}"))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
