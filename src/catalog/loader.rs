//! Catalog loading with fallback substitution.
//!
//! The three layer documents are independent, so they are requested
//! concurrently with [`join_all`], each bounded by a timeout. Completion order
//! does not matter; the loader waits for all three. When any one of them fails
//! the complete embedded dataset from [`super::fallback`] is used instead, so a
//! session never mixes real and sample layers.
//!
//! Sources implement [`DataSource`]:
//!
//! - [`DirectorySource`] reads `<dir>/<file>` with `tokio::fs`
//! - [`HttpSource`] fetches `<base_url>/<file>` with `reqwest`
//! - [`ConfiguredSource`] picks one of the two from a location string
//!
//! # Examples
//!
//! ```rust,no_run
//! use admap_cli::catalog::{DataFiles, DirectorySource, load_catalog};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = DirectorySource::new("data", DataFiles::default());
//! let (catalog, report) = load_catalog(&source, Duration::from_secs(30)).await?;
//! if report.used_fallback {
//!     eprintln!("using sample data: {} layer(s) failed", report.failures.len());
//! }
//! println!("{} villages", catalog.villages.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::FeatureCatalog;
use super::fallback::fallback_catalog;
use crate::constants::{DEFAULT_DISTRICT_FILE, DEFAULT_SUBUNIT_FILE, DEFAULT_VILLAGE_FILE};
use crate::core::{AdmapError, HierarchyLevel};
use crate::geojson::FeatureCollection;

/// File names of the three layer documents, relative to the data location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    /// District layer document
    pub district: String,
    /// Sub-unit layer document
    pub subunit: String,
    /// Village layer document
    pub village: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            district: DEFAULT_DISTRICT_FILE.to_string(),
            subunit: DEFAULT_SUBUNIT_FILE.to_string(),
            village: DEFAULT_VILLAGE_FILE.to_string(),
        }
    }
}

impl DataFiles {
    /// File name of a level's document.
    #[must_use]
    pub fn file(&self, level: HierarchyLevel) -> &str {
        match level {
            HierarchyLevel::District => &self.district,
            HierarchyLevel::SubUnit => &self.subunit,
            HierarchyLevel::Village => &self.village,
        }
    }
}

/// Somewhere the three layer documents can be loaded from.
pub trait DataSource: Send + Sync {
    /// Human-readable location of a level's document, for logs and errors.
    fn describe(&self, level: HierarchyLevel) -> String;

    /// Load and parse one level's document.
    fn load(&self, level: HierarchyLevel)
    -> impl Future<Output = Result<FeatureCollection>> + Send;
}

/// Layer documents stored in a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    files: DataFiles,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, files: DataFiles) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, level: HierarchyLevel) -> PathBuf {
        self.root.join(self.files.file(level))
    }
}

impl DataSource for DirectorySource {
    fn describe(&self, level: HierarchyLevel) -> String {
        self.path(level).display().to_string()
    }

    async fn load(&self, level: HierarchyLevel) -> Result<FeatureCollection> {
        let path = self.path(level);
        let location = path.display().to_string();
        debug!("Reading {} layer from {}", level, location);

        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AdmapError::DataLoadFailed {
                level,
                location: location.clone(),
                reason: e.to_string(),
            }
        })?;

        FeatureCollection::from_json_str(&text, &location)
    }
}

/// Layer documents served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    files: DataFiles,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, files: DataFiles) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            files,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, level: HierarchyLevel) -> String {
        format!("{}/{}", self.base_url, self.files.file(level))
    }
}

impl DataSource for HttpSource {
    fn describe(&self, level: HierarchyLevel) -> String {
        self.url(level)
    }

    async fn load(&self, level: HierarchyLevel) -> Result<FeatureCollection> {
        let url = self.url(level);
        debug!("Fetching {} layer from {}", level, url);

        let response =
            self.client.get(&url).send().await.map_err(|e| AdmapError::DataLoadFailed {
                level,
                location: url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AdmapError::HttpStatus {
                url,
                status: response.status().as_u16(),
            }
            .into());
        }

        let text = response.text().await.map_err(|e| AdmapError::DataLoadFailed {
            level,
            location: url.clone(),
            reason: e.to_string(),
        })?;

        FeatureCollection::from_json_str(&text, &url)
    }
}

/// Directory or HTTP source chosen from a configured location string.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Directory(DirectorySource),
    Http(HttpSource),
}

impl ConfiguredSource {
    /// `http://` and `https://` locations are fetched, anything else is a directory.
    #[must_use]
    pub fn from_location(location: &str, files: DataFiles) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http(HttpSource::new(location, files))
        } else {
            Self::Directory(DirectorySource::new(location, files))
        }
    }
}

impl DataSource for ConfiguredSource {
    fn describe(&self, level: HierarchyLevel) -> String {
        match self {
            Self::Directory(source) => source.describe(level),
            Self::Http(source) => source.describe(level),
        }
    }

    async fn load(&self, level: HierarchyLevel) -> Result<FeatureCollection> {
        match self {
            Self::Directory(source) => source.load(level).await,
            Self::Http(source) => source.load(level).await,
        }
    }
}

/// One layer that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub level: HierarchyLevel,
    pub reason: String,
}

/// Outcome of a catalog load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Whether the embedded dataset replaced the requested one
    pub used_fallback: bool,
    /// Per-layer failures that caused the substitution
    pub failures: Vec<LoadFailure>,
}

async fn load_level<S: DataSource>(
    source: &S,
    level: HierarchyLevel,
    timeout: Duration,
) -> Result<FeatureCollection> {
    match tokio::time::timeout(timeout, source.load(level)).await {
        Ok(result) => result,
        Err(_) => Err(AdmapError::LoadTimeout {
            location: source.describe(level),
            elapsed: timeout,
        }
        .into()),
    }
}

/// Load all three layers, substituting the fallback dataset on any failure.
///
/// # Errors
///
/// Only fails with [`AdmapError::FallbackUnavailable`], when a layer failed and
/// the embedded dataset could not be built either.
pub async fn load_catalog<S: DataSource>(
    source: &S,
    timeout: Duration,
) -> Result<(FeatureCatalog, LoadReport)> {
    let loads =
        HierarchyLevel::all().iter().map(|&level| async move {
            (level, load_level(source, level, timeout).await)
        });
    let results = join_all(loads).await;

    let mut layers: Vec<FeatureCollection> = Vec::with_capacity(3);
    let mut failures = Vec::new();
    for (level, result) in results {
        match result {
            Ok(collection) => layers.push(collection),
            Err(e) => {
                warn!("Failed to load {} layer from {}: {:#}", level, source.describe(level), e);
                failures.push(LoadFailure {
                    level,
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    if failures.is_empty() {
        let mut layers = layers.into_iter();
        if let (Some(districts), Some(subunits), Some(villages)) =
            (layers.next(), layers.next(), layers.next())
        {
            let catalog = FeatureCatalog::new(districts, subunits, villages);
            let totals = catalog.totals();
            info!(
                "Loaded {} districts, {} sub-units, {} villages",
                totals.districts, totals.subunits, totals.villages
            );
            return Ok((catalog, LoadReport::default()));
        }
    }

    warn!("Using embedded sample data after {} failed layer load(s)", failures.len());
    let catalog = fallback_catalog()?;
    Ok((
        catalog,
        LoadReport {
            used_fallback: true,
            failures,
        },
    ))
}
