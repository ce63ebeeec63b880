//! admap CLI entry point
//!
//! Parses arguments, runs the selected command and turns failures into a
//! readable error with a suggestion.
//!
//! - `options` - Choice lists for a selection path
//! - `search` - Village search
//! - `info` - Selection summary and data report
//! - `layers` - Features of one level
//! - `shell` - Interactive session
//! - `clean` - Village dataset preparation
//! - `config` - Configuration file management

use admap_cli::cli;
use admap_cli::core::user_friendly_error;
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
