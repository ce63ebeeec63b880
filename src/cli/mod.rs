//! Command-line interface for admap.
//!
//! The `admap` binary drives the navigation engine from a terminal. One-shot
//! commands answer a single question; `shell` keeps a session open and plays
//! the role of the interactive controls.
//!
//! # Commands
//!
//! - `options` - Choice lists (and highlights) for an optional selection path
//! - `search` - Search villages by name; a unique hit is selected
//! - `info` - Selection summary, catalog totals and resolved name keys
//! - `layers` - Features of one level with their ids, for `click`
//! - `shell` - Interactive session reading commands from stdin
//! - `clean` - Add clean labels and reference columns to a village layer
//! - `config` - Show, create or locate the configuration file
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging on stderr
//! - `--quiet` / `-q` - No logging at all
//! - `--config` / `-c` - Configuration file to use (also `ADMAP_CONFIG`)
//! - `--data` - Data directory or base URL, overriding the configuration
//! - `--match-mode` - `district-scoped` or `unscoped` sub-unit highlighting
//! - `--no-progress` - No spinner while loading (also `ADMAP_NO_PROGRESS`)
//!
//! # Examples
//!
//! ```bash
//! # Choice lists after picking a district and sub-unit
//! admap options --district "24 Paraganas South" --subunit Basanti
//!
//! # Find a village and print the resulting view as JSON
//! admap search kumir --format json
//!
//! # Interactive session against a remote dataset
//! admap --data https://maps.example.org/data shell
//! ```

mod clean;
pub mod common;
mod config;
mod info;
mod layers;
mod options;
mod search;
pub mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::AdmapConfig;
use crate::highlight::SubUnitMatchMode;

/// Settings derived from the global flags, shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` disables logging
    pub log_level: Option<String>,

    /// Suppress spinners
    pub no_progress: bool,

    /// Explicit configuration file
    pub config_path: Option<PathBuf>,

    /// Data location overriding the configuration file
    pub data: Option<String>,

    /// Match mode overriding the configuration file
    pub match_mode: Option<SubUnitMatchMode>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber on stderr.
    ///
    /// `RUST_LOG` takes precedence over the verbosity flags when set.
    pub fn init_logging(&self) {
        let filter = match (EnvFilter::try_from_default_env(), &self.log_level) {
            (Ok(filter), _) => filter,
            (Err(_), Some(level)) => EnvFilter::new(level),
            (Err(_), None) => EnvFilter::new("off"),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Configuration file contents with flag overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub async fn resolve_config(&self) -> Result<AdmapConfig> {
        let mut config = AdmapConfig::load_with_optional(self.config_path.clone()).await?;
        if let Some(data) = &self.data {
            config.data.clone_from(data);
        }
        if let Some(mode) = self.match_mode {
            config.match_mode = mode;
        }
        Ok(config)
    }
}

/// Main CLI structure for admap.
#[derive(Parser)]
#[command(
    name = "admap",
    about = "Navigate district, sub-unit and village boundaries from GeoJSON layers",
    version,
    long_about = "admap loads three GeoJSON layers (districts, sub-units, villages) and lets you \
                  drill down through them: cascading choice lists, highlighted features and \
                  village search, from one-shot commands or an interactive shell."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "ADMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory or http(s) base URL
    #[arg(long, global = true)]
    data: Option<String>,

    /// Sub-unit highlight rule
    #[arg(long, global = true, value_parser = clap::value_parser!(SubUnitMatchMode))]
    match_mode: Option<SubUnitMatchMode>,

    /// Disable progress spinners
    #[arg(
        long,
        global = true,
        env = "ADMAP_NO_PROGRESS",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the choice lists for a selection path
    Options(options::OptionsCommand),

    /// Search villages by name
    Search(search::SearchCommand),

    /// Summarize the selection and the loaded data
    Info(info::InfoCommand),

    /// List the features of one level
    Layers(layers::LayersCommand),

    /// Start an interactive session
    Shell(shell::ShellCommand),

    /// Clean village names and add reference columns
    Clean(clean::CleanCommand),

    /// Manage the configuration file
    Config(config::ConfigCommand),
}

impl Cli {
    /// Run the selected command.
    ///
    /// # Errors
    ///
    /// Returns whatever error the command fails with; `main` turns it into a
    /// user-facing message.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
            data: self.data.clone(),
            match_mode: self.match_mode,
        }
    }

    /// Run the selected command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns whatever error the command fails with.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Options(cmd) => cmd.execute(&config).await,
            Commands::Search(cmd) => cmd.execute(&config).await,
            Commands::Info(cmd) => cmd.execute(&config).await,
            Commands::Layers(cmd) => cmd.execute(&config).await,
            Commands::Shell(cmd) => cmd.execute(&config).await,
            Commands::Clean(cmd) => cmd.execute(),
            Commands::Config(cmd) => cmd.execute(&config).await,
        }
    }
}
