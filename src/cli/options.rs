//! Show the cascading choice lists for a selection path.
//!
//! Without arguments only the district list is enabled. Each of
//! `--district`, `--subunit` and `--village` is checked against the list
//! offered at that point, so a typo is reported with the closest valid
//! choice instead of producing an empty view.
//!
//! # Examples
//!
//! ```bash
//! admap options
//! admap options --district "24 Paraganas South"
//! admap options --district "24 Paraganas South" --subunit Basanti --format json
//! ```

use anyhow::Result;
use clap::Args;

use super::CliConfig;
use super::common::{CommandContext, OutputFormat, SelectionArgs};

/// Command to print the choice lists and highlights for a selection.
#[derive(Args)]
pub struct OptionsCommand {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl OptionsCommand {
    /// Load the data, apply the selection and render the resulting view.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected name is not offered at its level, or if
    /// writing the output fails.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let mut ctx = CommandContext::load(config).await?;
        let update = self.selection.apply(&mut ctx.session)?;

        let stdout = std::io::stdout();
        let mut renderer = self.format.renderer(stdout.lock());
        renderer.render(&update, ctx.session.catalog())
    }
}
