//! admap - administrative map navigator
//!
//! Drill down through three GeoJSON layers of an administrative hierarchy:
//! districts, their sub-units (labelled "SS" in much of the source data) and
//! the villages inside those. admap keeps a district → sub-unit → village
//! selection consistent, derives the cascading choice lists for it, works out
//! which features of each layer to highlight, and searches villages by name.
//!
//! # Architecture Overview
//!
//! Data flows one way through the crate:
//!
//! 1. [`catalog`] loads the three layer documents concurrently from a
//!    directory or an HTTP base URL. If any document fails, the whole
//!    embedded fallback dataset is used instead and the failures are
//!    reported.
//! 2. [`properties`] inspects one sample feature per layer and resolves
//!    which property carries each level's name and each parent reference.
//! 3. [`session`] owns the catalog, the resolved keys and the
//!    [`selection`] state machine. Every event (a list choice, a feature
//!    click, a search, a reset) yields a [`session::ViewUpdate`] built by
//!    [`cascade`] (choice lists) and [`highlight`] (feature id sets).
//! 4. [`render`] turns view updates into terminal text or JSON.
//!
//! The engine itself never draws, never blocks and holds no global state;
//! only loading is asynchronous.
//!
//! # Core Modules
//!
//! ## Engine
//! - [`catalog`] - Feature catalog, data sources, concurrent loading, fallback data
//! - [`properties`] - Name-key resolution and typed property accessors
//! - [`selection`] - Hierarchical selection state machine
//! - [`cascade`] - Choice lists derived from the selection
//! - [`highlight`] - Highlighted feature ids per level
//! - [`search`] - Case-insensitive village search
//! - [`session`] - Event handlers tying the engine together
//!
//! ## Data
//! - [`geojson`] - Minimal GeoJSON feature model with bounding boxes
//! - [`clean`] - Village name cleaning and dataset enrichment
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface and interactive shell
//! - [`config`] - User configuration file (`~/.admap/config.toml`)
//! - [`core`] - Hierarchy levels and error handling
//! - [`render`] - Terminal and JSON renderers
//! - [`utils`] - File writing and progress helpers
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Choice lists for a partial selection
//! admap options --district "24 Paraganas South"
//!
//! # Search, selecting a unique hit
//! admap search kumir
//!
//! # Interactive session
//! admap --data ./data shell
//!
//! # Prepare a raw village export
//! admap clean raw_villages.geojson -o data/villages.geojson
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use admap_cli::catalog::{DataFiles, DirectorySource, load_catalog};
//! use admap_cli::session::Session;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = DirectorySource::new("data", DataFiles::default());
//! let (catalog, report) = load_catalog(&source, Duration::from_secs(30)).await?;
//! if report.used_fallback {
//!     eprintln!("using built-in sample data");
//! }
//!
//! let mut session = Session::new(catalog);
//! let update = session.on_district_chosen(Some("24 Paraganas South"));
//! println!("{:?}", update.options.subunits.values());
//! # Ok(())
//! # }
//! ```

pub mod cascade;
pub mod catalog;
pub mod clean;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod geojson;
pub mod highlight;
pub mod properties;
pub mod render;
pub mod search;
pub mod selection;
pub mod session;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
