//! Integration tests for configuration handling and `admap config`.

mod common;

use admap_cli::config::AdmapConfig;
use assert_cmd::Command;
use common::TestData;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn admap_with_config(path: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("admap").unwrap();
    cmd.arg("--config").arg(path).arg("--no-progress").env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("admap.toml");
    admap_with_config(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("admap.toml"));
}

#[test]
fn test_config_init_and_force() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("admap.toml");

    admap_with_config(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(toml::from_str::<AdmapConfig>(&written).unwrap(), AdmapConfig::default());

    admap_with_config(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    admap_with_config(&path).args(["config", "init", "--force"]).assert().success();
}

#[test]
fn test_config_show_includes_overrides() {
    let data = TestData::new();
    data.admap()
        .args(["--match-mode", "unscoped", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Configuration file:"))
        .stdout(predicate::str::contains("match_mode = \"unscoped\""))
        .stdout(predicate::str::contains("fetch_timeout_secs = 5"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    admap_with_config(&temp.path().join("absent.toml"))
        .arg("options")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("admap config init"));
}

#[test]
fn test_config_from_environment() {
    let data = TestData::new();
    let mut cmd = Command::cargo_bin("admap").unwrap();
    cmd.env("ADMAP_CONFIG", data.config_path())
        .env("ADMAP_NO_PROGRESS", "1")
        .env("NO_COLOR", "1")
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gosaba Block"));
}

#[test]
fn test_invalid_config_reports_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("admap.toml");
    fs::write(&path, "fetch_timeout_secs = 0\n").unwrap();

    admap_with_config(&path)
        .arg("options")
        .assert()
        .failure()
        .stderr(predicate::str::contains("fetch_timeout_secs must be greater than zero"));
}
