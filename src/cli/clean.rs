//! Prepare a raw village export for navigation.
//!
//! Adds the `village_clean` label and the `village_code`, `block_name`,
//! `subdistric_name` and `district_name` reference columns, then sorts the
//! villages by district, sub-unit and label.
//!
//! ```bash
//! # Write the enriched layer next to the others and print a summary
//! admap clean raw_villages.geojson -o data/villages.geojson
//!
//! # Pipe the enriched GeoJSON somewhere else
//! admap clean raw_villages.geojson > villages.geojson
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

use crate::clean::{EnrichReport, enrich_villages};
use crate::geojson::FeatureCollection;
use crate::utils::fs::safe_write;

/// How many districts the summary lists.
const TOP_DISTRICTS: usize = 10;

/// Command to enrich a village GeoJSON document.
#[derive(Args)]
pub struct CleanCommand {
    /// Raw village GeoJSON file
    input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl CleanCommand {
    /// Read, enrich and write the village layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or is not a feature
    /// collection, or if the output cannot be written.
    pub fn execute(self) -> Result<()> {
        let text = std::fs::read_to_string(&self.input)
            .with_context(|| format!("Failed to read {}", self.input.display()))?;
        let raw = FeatureCollection::from_json_str(&text, &self.input.display().to_string())?;

        let enriched = enrich_villages(&raw);
        let json = enriched.to_json_pretty()?;

        match &self.output {
            Some(path) => {
                safe_write(path, &json)?;
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "{} Wrote {}", "✓".green(), path.display())?;
                write_report(&mut out, &EnrichReport::of(&enriched))?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "{json}")?;
            }
        }
        Ok(())
    }
}

fn write_report<W: Write>(out: &mut W, report: &EnrichReport) -> Result<()> {
    writeln!(out, "Villages: {}", report.villages.to_string().bold())?;
    writeln!(out, "Total area: {:.2} km²", report.total_area_km2)?;
    if !report.per_district.is_empty() {
        writeln!(out, "Villages per district:")?;
        for count in report.per_district.iter().take(TOP_DISTRICTS) {
            let name = if count.district.is_empty() { "(none)" } else { count.district.as_str() };
            writeln!(out, "  {:>6}  {}", count.villages, name)?;
        }
    }
    Ok(())
}
