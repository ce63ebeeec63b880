//! Manage the admap configuration file.
//!
//! # Examples
//!
//! ```bash
//! admap config              # same as `admap config show`
//! admap config init         # write a file with the default settings
//! admap config init --force # overwrite an existing file
//! admap config path         # print where the file lives
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::CliConfig;
use crate::config::AdmapConfig;

/// Command to manage the configuration file.
#[derive(Args)]
pub struct ConfigCommand {
    /// Configuration operation to perform
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration, flag overrides included.
    ///
    /// This is the default when no subcommand is given.
    Show,

    /// Write a configuration file with the default settings.
    ///
    /// Refuses to overwrite an existing file unless `--force` is given.
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Print the path of the configuration file.
    Path,
}

impl ConfigCommand {
    /// Run the selected configuration operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or written, or if
    /// `init` would overwrite a file without `--force`.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        match self.command {
            None | Some(ConfigSubcommands::Show) => Self::show(config).await,
            Some(ConfigSubcommands::Init { force }) => Self::init(config, force).await,
            Some(ConfigSubcommands::Path) => Self::path(config),
        }
    }

    async fn show(config: &CliConfig) -> Result<()> {
        let path = AdmapConfig::resolve_path(config.config_path.as_deref())?;
        let effective = config.resolve_config().await?;

        if path.exists() {
            println!("{} {}", "# Configuration file:".bright_black(), path.display());
        } else {
            println!("{}", "# No configuration file, showing defaults".bright_black());
            println!("{} {}", "# Create one with:".bright_black(), "admap config init".cyan());
        }
        println!("{}", effective.to_toml_string()?);
        Ok(())
    }

    async fn init(config: &CliConfig, force: bool) -> Result<()> {
        let path = AdmapConfig::resolve_path(config.config_path.as_deref())?;

        if path.exists() && !force {
            println!("{} Configuration already exists at {}", "!".yellow(), path.display());
            println!("  Use {} to overwrite it", "admap config init --force".cyan());
            return Err(anyhow::anyhow!("Configuration file already exists at {}", path.display()));
        }

        AdmapConfig::default().save_to(&path).await?;
        println!("{} Created configuration at {}", "✓".green(), path.display());
        Ok(())
    }

    fn path(config: &CliConfig) -> Result<()> {
        let path = AdmapConfig::resolve_path(config.config_path.as_deref())?;
        println!("{}", path.display());
        Ok(())
    }
}
