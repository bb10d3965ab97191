//! Config file test utilities

use std::path::PathBuf;

use tempfile::TempDir;

use ucs_version::config::{AppConfig, ConfigStore, YamlConfigStore};

/// Create a YAML config store in a temp dir, optionally pre-populated
pub fn create_test_store(config: Option<AppConfig>) -> (TempDir, YamlConfigStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = YamlConfigStore::new(temp_dir.path().join("config.yaml"));

    if let Some(config) = config {
        store.save(&config).unwrap();
    }

    (temp_dir, store)
}

/// Write a release document next to the config and return its path
pub fn write_catalog(temp_dir: &TempDir, content: &str) -> PathBuf {
    let path = temp_dir.path().join("releases.json");
    std::fs::write(&path, content).unwrap();
    path
}
