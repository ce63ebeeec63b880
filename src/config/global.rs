//! User configuration file
//!
//! Settings that outlive one run live in a TOML file:
//!
//! - Unix/macOS: `~/.admap/config.toml`
//! - Windows: `%LOCALAPPDATA%\admap\config.toml`
//!
//! The `ADMAP_CONFIG` environment variable and the `--config` flag point at a
//! different file. A missing default file means built-in defaults; a missing
//! file that was asked for explicitly is an error.
//!
//! ```toml
//! data = "data"                    # directory (~ and $VAR expand) or http(s) base URL
//! match_mode = "district-scoped"   # or "unscoped"
//! fetch_timeout_secs = 30
//!
//! [files]
//! district = "districts.geojson"
//! subunit = "ss.geojson"
//! village = "villages.geojson"
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use admap_cli::config::AdmapConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AdmapConfig::load().await?;
//! println!("Loading data from {}", config.data);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::catalog::{ConfiguredSource, DataFiles};
use crate::constants::{CONFIG_ENV, DEFAULT_DATA_LOCATION, DEFAULT_FETCH_TIMEOUT_SECS};
use crate::core::AdmapError;
use crate::highlight::SubUnitMatchMode;

const fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_data() -> String {
    DEFAULT_DATA_LOCATION.to_string()
}

/// Settings read from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmapConfig {
    /// Directory path or `http(s)://` base URL of the layer documents
    #[serde(default = "default_data")]
    pub data: String,

    /// Sub-unit highlight rule
    #[serde(default)]
    pub match_mode: SubUnitMatchMode,

    /// Per-document load timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Layer document file names
    #[serde(default)]
    pub files: DataFiles,
}

impl Default for AdmapConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            match_mode: SubUnitMatchMode::default(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            files: DataFiles::default(),
        }
    }
}

impl AdmapConfig {
    /// Load from `ADMAP_CONFIG` or the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from an explicit path, falling back to [`AdmapConfig::load`]'s lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AdmapError::ConfigNotFound`] when an explicitly named file
    /// (flag or environment) does not exist, or a parse error.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let explicit = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AdmapError::ConfigNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Self::load_from(&path).await
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path).await
                } else {
                    debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load and validate a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or
    /// [`AdmapError::ConfigError`] if its content is not a valid configuration.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| AdmapError::ConfigError {
            message: format!("{}: {e}", path.display()),
        })?;
        config.validate()?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = self.to_toml_string()?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Serialize as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Platform default location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("admap")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".admap")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The file a load would read: explicit path, then `ADMAP_CONFIG`, then the default.
    ///
    /// # Errors
    ///
    /// Returns an error if no explicit path is given and the default cannot be determined.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.fetch_timeout_secs == 0 {
            return Err(AdmapError::ConfigError {
                message: "fetch_timeout_secs must be greater than zero".to_string(),
            }
            .into());
        }
        if self.data.trim().is_empty() {
            return Err(AdmapError::ConfigError {
                message: "data location must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Data source for the configured location and file names.
    ///
    /// A leading `~` and `$VAR` references in the location are expanded.
    ///
    /// # Errors
    ///
    /// Returns [`AdmapError::ConfigError`] if the location references an
    /// undefined environment variable.
    pub fn source(&self) -> Result<ConfiguredSource> {
        let location = shellexpand::full(&self.data).map_err(|e| AdmapError::ConfigError {
            message: format!("cannot expand data location '{}': {e}", self.data),
        })?;
        Ok(ConfiguredSource::from_location(&location, self.files.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = AdmapConfig::load_with_optional(Some(temp.path().join("none.toml")))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdmapError>(),
            Some(AdmapError::ConfigNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "match_mode = \"unscoped\"\n[files]\nvillage = \"v.geojson\"\n")
            .unwrap();

        let config = AdmapConfig::load_from(&path).await.unwrap();
        assert_eq!(config.match_mode, SubUnitMatchMode::Unscoped);
        assert_eq!(config.data, "data");
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.files.village, "v.geojson");
        assert_eq!(config.files.district, "districts.geojson");
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = AdmapConfig {
            data: "https://maps.example.org/data".to_string(),
            fetch_timeout_secs: 5,
            ..AdmapConfig::default()
        };
        config.save_to(&path).await.unwrap();

        let loaded = AdmapConfig::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
        assert!(matches!(loaded.source().unwrap(), ConfiguredSource::Http(_)));
        assert_eq!(loaded.fetch_timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_invalid_values_are_config_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        std::fs::write(&path, "match_mode = \"fuzzy\"\n").unwrap();
        let err = AdmapConfig::load_from(&path).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AdmapError>(), Some(AdmapError::ConfigError { .. })));

        std::fs::write(&path, "fetch_timeout_secs = 0\n").unwrap();
        let err = AdmapConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_source_expands_home_directory() {
        let config = AdmapConfig {
            data: "~/maps".to_string(),
            ..AdmapConfig::default()
        };
        let Ok(ConfiguredSource::Directory(source)) = config.source() else {
            panic!("expected a directory source");
        };
        let home = dirs::home_dir().unwrap();
        assert_eq!(source.root(), home.join("maps").as_path());
    }

    #[test]
    fn test_source_rejects_undefined_variable() {
        let config = AdmapConfig {
            data: "$ADMAP_TEST_UNDEFINED_DATA_ROOT/maps".to_string(),
            ..AdmapConfig::default()
        };
        let err = config.source().unwrap_err();
        assert!(matches!(err.downcast_ref::<AdmapError>(), Some(AdmapError::ConfigError { .. })));
        assert!(err.to_string().contains("ADMAP_TEST_UNDEFINED_DATA_ROOT"));
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/admap-explicit.toml");
        assert_eq!(AdmapConfig::resolve_path(Some(&explicit)).unwrap(), explicit);
    }
}
