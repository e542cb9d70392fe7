//! Shared test infrastructure for integration tests.

use serde_json::Value;
use std::path::PathBuf;
use std::sync::Once;

static TRACING: Once = Once::new();

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Route engine events to the test writer; `RUST_LOG` controls the level.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Decode a YAML fixture from tests/fixtures/ into a document tree.
pub fn load_fixture(name: &str) -> anyhow::Result<Value> {
    init_tracing();
    let path = manifest_dir().join("tests/fixtures").join(name);
    let text = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let document: Value = serde_yaml::from_str(&text)?;
    Ok(document)
}

/// The standard roadmap fixture.
pub fn roadmap() -> Value {
    load_fixture("roadmap.yml").expect("load roadmap fixture")
}
