//! Shared helpers for admap integration tests
#![allow(dead_code)]

use admap_cli::catalog::FeatureCatalog;
use admap_cli::config::AdmapConfig;
use admap_cli::test_utils::{scenario_catalog, write_catalog_files};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary data directory plus a config file pointing at it.
pub struct TestData {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    root: PathBuf,
}

impl TestData {
    /// Scenario catalog: Gosaba Block / Basanti / Satjelia, Kumirmari
    pub fn new() -> Self {
        Self::with_catalog(&scenario_catalog())
    }

    pub fn with_catalog(catalog: &FeatureCatalog) -> Self {
        let data = Self::empty();
        write_catalog_files(&data.data_dir(), catalog).expect("write layer files");
        data
    }

    /// Config pointing at a data directory that does not exist
    pub fn missing() -> Self {
        Self::empty()
    }

    fn empty() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        let data = Self {
            _temp_dir: temp_dir,
            root,
        };

        let config = AdmapConfig {
            data: data.data_dir().display().to_string(),
            fetch_timeout_secs: 5,
            ..AdmapConfig::default()
        };
        fs::write(data.config_path(), config.to_toml_string().expect("serialize config"))
            .expect("write config");
        data
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// `admap --config <config> --no-progress` with colors and logging off
    pub fn admap(&self) -> Command {
        let mut cmd = Command::cargo_bin("admap").expect("admap binary");
        cmd.arg("--config")
            .arg(self.config_path())
            .arg("--no-progress")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("ADMAP_CONFIG");
        cmd
    }
}
