//! List the features of one hierarchy level.
//!
//! Feature ids printed here are the ones `click` accepts in the shell.
//!
//! ```bash
//! admap layers village
//! admap layers ss --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use super::CliConfig;
use super::common::{CommandContext, OutputFormat};
use crate::core::HierarchyLevel;
use crate::geojson::{Bounds, FeatureId};
use crate::properties::{ancestor_name, display_name};
use crate::session::Session;

/// Command to list the features of a level.
#[derive(Args)]
pub struct LayersCommand {
    /// Level to list: district, subunit (ss) or village
    level: HierarchyLevel,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    pub id: FeatureId,
    pub name: Option<String>,
    /// Ancestor names recorded on the feature, outermost first
    pub parents: Vec<String>,
    pub bounds: Option<Bounds>,
}

/// Rows for every feature of `level` in document order.
#[must_use]
pub fn layer_entries(session: &Session, level: HierarchyLevel) -> Vec<LayerEntry> {
    let keys = session.name_keys();
    session
        .catalog()
        .collection(level)
        .iter()
        .map(|(id, feature)| LayerEntry {
            id,
            name: display_name(feature, keys, level).map(str::to_string),
            parents: HierarchyLevel::all()
                .iter()
                .filter(|ancestor| **ancestor < level)
                .filter_map(|ancestor| ancestor_name(feature, keys, level, *ancestor))
                .map(str::to_string)
                .collect(),
            bounds: feature.bounds(),
        })
        .collect()
}

impl LayersCommand {
    /// Print the features of the requested level.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the data or writing the output fails.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config).await?;
        let entries = layer_entries(&ctx.session, self.level);

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &entries)?;
                writeln!(out)?;
            }
            OutputFormat::Text => write_entries(&mut out, self.level, &entries)?,
        }
        Ok(())
    }
}

fn write_entries<W: Write>(
    out: &mut W,
    level: HierarchyLevel,
    entries: &[LayerEntry],
) -> Result<()> {
    writeln!(out, "{} ({} features)", level.label().cyan().bold(), entries.len())?;
    for entry in entries {
        let mut line = format!(
            "  {:>5} {}",
            entry.id.to_string().bright_black(),
            entry.name.as_deref().unwrap_or("?")
        );
        if !entry.parents.is_empty() {
            line.push_str(&format!(" ({})", entry.parents.join(" > ")).bright_black().to_string());
        }
        if let Some(bounds) = entry.bounds {
            line.push_str(&format!("  {bounds}"));
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}
