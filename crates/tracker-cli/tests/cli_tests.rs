//! End-to-end tests that run the compiled `policy-tracker` binary
//! against a temporary config, checkout and ledger.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use tracker_test_utils::tree::SourceTree;

const REPO_ID: &str = "0b0c5b3a-8a0e-4b8e-9a55-4c1b6a9f2f10";

fn policy_tracker() -> Command {
    let mut cmd = Command::cargo_bin("policy-tracker").unwrap();
    cmd.env_remove("POLICY_TRACKER_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Write a config tracking `checkout` and return its path.
fn write_config(dir: &Path, checkout: &Path) -> PathBuf {
    let config = format!(
        r#"[tracker]
ledger = "state/catalog.json"

[[repositories]]
id = "{REPO_ID}"
name = "library"
url = "https://github.com/org/policies/library"
checkout = "{}"
"#,
        checkout.display()
    );
    let path = dir.join("tracker.toml");
    fs::write(&path, config).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    policy_tracker()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("track"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_missing_config_fails() {
    let temp = TempDir::new().unwrap();
    policy_tracker()
        .args(["--config"])
        .arg(temp.path().join("absent.toml"))
        .arg("track")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn test_track_registers_then_skips() {
    let temp = TempDir::new().unwrap();
    let tree = SourceTree::with_packages_path("library");
    tree.add_version("k8s-labels", "1.0.0");
    tree.add_version("k8s-labels", "1.1.0");
    let config = write_config(temp.path(), tree.root());

    policy_tracker()
        .arg("--config")
        .arg(&config)
        .arg("track")
        .assert()
        .success()
        .stdout(predicate::str::contains("registered 2"));

    let ledger = fs::read_to_string(temp.path().join("state/catalog.json")).unwrap();
    assert!(ledger.contains("k8s-labels@1.1.0"));
    assert!(ledger.contains("https://github.com/org/policies/blob/master/library/k8s-labels/1.1.0"));

    policy_tracker()
        .arg("--config")
        .arg(&config)
        .arg("track")
        .assert()
        .success()
        .stdout(predicate::str::contains("registered 0, skipped 2"));
}

#[test]
fn test_track_unregisters_removed_versions() {
    let temp = TempDir::new().unwrap();
    let tree = SourceTree::with_packages_path("library");
    tree.add_version("pkg", "1.0.0");
    tree.add_version("pkg", "2.0.0");
    let config = write_config(temp.path(), tree.root());

    policy_tracker().arg("--config").arg(&config).arg("track").assert().success();
    tree.remove_version("pkg", "1.0.0");
    policy_tracker()
        .arg("--config")
        .arg(&config)
        .arg("track")
        .assert()
        .success()
        .stdout(predicate::str::contains("unregistered 1"));

    let ledger = fs::read_to_string(temp.path().join("state/catalog.json")).unwrap();
    assert!(!ledger.contains("pkg@1.0.0"));
    assert!(ledger.contains("pkg@2.0.0"));
}

#[test]
fn test_track_json_reports_isolated_errors() {
    let temp = TempDir::new().unwrap();
    let tree = SourceTree::with_packages_path("library");
    tree.add_version("pkg", "1.0.0");
    tree.add_dir("pkg/latest");
    let config = write_config(temp.path(), tree.root());

    let output = policy_tracker()
        .arg("--config")
        .arg(&config)
        .args(["track", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summaries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summary = &summaries[0];
    assert_eq!(summary["name"], "library");
    assert_eq!(summary["report"]["registered"], 1);
    assert_eq!(summary["report"]["failed"], 1);
    assert!(summary["errors"][0].as_str().unwrap().contains("(latest)"));
}

#[test]
fn test_missing_checkout_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), &temp.path().join("no-such-checkout"));

    policy_tracker()
        .arg("--config")
        .arg(&config)
        .arg("track")
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed:"))
        .stderr(predicate::str::contains("could not be tracked"));
}

#[test]
fn test_unknown_repository_filter_fails() {
    let temp = TempDir::new().unwrap();
    let tree = SourceTree::new();
    let config = write_config(temp.path(), tree.root());

    policy_tracker()
        .arg("--config")
        .arg(&config)
        .args(["track", "-r", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown repository: nope"));
}

#[test]
fn test_status_lists_registered_versions() {
    let temp = TempDir::new().unwrap();
    let tree = SourceTree::with_packages_path("library");
    tree.add_version("pkg", "1.0.0");
    let config = write_config(temp.path(), tree.root());

    policy_tracker().arg("--config").arg(&config).arg("track").assert().success();

    policy_tracker()
        .arg("--config")
        .arg(&config)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("library"))
        .stdout(predicate::str::contains("pkg@1.0.0"));
}
