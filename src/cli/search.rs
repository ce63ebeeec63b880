//! Search villages by name.
//!
//! The query is matched case-insensitively as a substring of each village's
//! name and clean label. A single hit is selected along its district and
//! sub-unit, and the resulting view is printed. Several hits are listed with
//! their paths and nothing is selected.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::Write;

use super::CliConfig;
use super::common::{CommandContext, OutputFormat};
use crate::search::SearchOutcome;

/// Command to search villages.
#[derive(Args)]
pub struct SearchCommand {
    /// Text to look for in village names
    query: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl SearchCommand {
    /// Run the search and print its outcome.
    ///
    /// A query without matches is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the data or writing the output fails.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let mut ctx = CommandContext::load(config).await?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        let Some(outcome) = ctx.session.on_search(&self.query) else {
            writeln!(out, "{}", "Enter a village name to search".yellow())?;
            return Ok(());
        };

        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut out, &outcome)?;
            writeln!(out)?;
            return Ok(());
        }

        print_outcome(&mut out, &outcome)?;
        if matches!(outcome, SearchOutcome::Unique { .. }) {
            writeln!(out)?;
            let update = ctx.session.view();
            self.format.renderer(&mut out).render(&update, ctx.session.catalog())?;
        }
        Ok(())
    }
}

/// Describe a search outcome in one or more text lines.
pub(crate) fn print_outcome<W: Write>(out: &mut W, outcome: &SearchOutcome) -> Result<()> {
    match outcome {
        SearchOutcome::NotFound { query } => {
            writeln!(out, "{} No village matches '{}'", "✗".red(), query)?;
        }
        SearchOutcome::Unique { path, .. } => {
            writeln!(out, "{} Found {}", "✓".green(), path.to_string().bold())?;
        }
        SearchOutcome::Ambiguous { count, matches } => {
            writeln!(out, "{} villages match; choose one:", count.to_string().yellow().bold())?;
            for m in matches {
                writeln!(
                    out,
                    "  {} {} ({})",
                    m.feature.to_string().bright_black(),
                    m.label,
                    m.path
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::test_utils::scenario_catalog;

    fn describe(query: &str) -> String {
        colored::control::set_override(false);
        let mut session = Session::new(scenario_catalog());
        let outcome = session.on_search(query).unwrap();
        let mut buffer = Vec::new();
        print_outcome(&mut buffer, &outcome).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_describe_outcomes() {
        assert!(describe("kumir").contains("Found Gosaba Block > Basanti > Kumirmari"));
        assert!(describe("zzz").contains("No village matches 'zzz'"));

        let ambiguous = describe("i");
        assert!(ambiguous.contains("2 villages match"));
        assert!(ambiguous.contains("Satjelia (Gosaba Block > Basanti > Satjelia)"));
    }
}
