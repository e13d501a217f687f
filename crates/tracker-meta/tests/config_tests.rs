//! Integration tests for configuration loading

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tracker_meta::{Error, load_config};

fn write_config(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join("tracker.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_minimal_config() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "");

    let config = load_config(&path).unwrap();

    assert!(!config.tracker.settings.bypass_digest_check);
    assert!(config.repositories.is_empty());
    assert_eq!(config.tracker.ledger, temp.path().join("catalog.json"));
}

#[test]
fn test_load_config_with_repositories() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
[tracker]
bypass_digest_check = true
ledger = "state/catalog.json"

[[repositories]]
id = "0b0c5b3a-8a0e-4b8e-9a55-4c1b6a9f2f10"
name = "gatekeeper"
url = "https://github.com/org/policies/library"
checkout = "checkouts/gatekeeper"
"#,
    );

    let config = load_config(&path).unwrap();

    assert!(config.tracker.settings.bypass_digest_check);
    assert_eq!(config.tracker.ledger, temp.path().join("state/catalog.json"));
    assert_eq!(config.repositories.len(), 1);
    assert_eq!(config.repositories[0].name, "gatekeeper");
    assert_eq!(
        config.repositories[0].checkout,
        temp.path().join("checkouts/gatekeeper")
    );
}

#[test]
fn test_duplicate_repository_ids_rejected() {
    let temp = TempDir::new().unwrap();
    let repo = r#"
[[repositories]]
id = "0b0c5b3a-8a0e-4b8e-9a55-4c1b6a9f2f10"
name = "dup"
url = "https://github.com/org/policies"
checkout = "a"
"#;
    let path = write_config(&temp, &format!("{repo}{repo}"));

    let err = load_config(&path).unwrap_err();

    assert!(matches!(err, Error::InvalidConfig { .. }));
    assert!(err.to_string().contains("duplicate repository id"));
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();

    let err = load_config(&temp.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, Error::ConfigNotFound { .. }));
}
