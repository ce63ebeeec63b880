//! Summarize a selection and the loaded data.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use super::CliConfig;
use super::common::{CommandContext, OutputFormat, SelectionArgs};
use crate::catalog::LoadFailure;
use crate::geojson::Bounds;
use crate::highlight::SubUnitMatchMode;
use crate::properties::NameKeyTable;
use crate::session::{FocusTarget, SelectionSummary};

/// Command to print the selection summary, totals and resolved name keys.
#[derive(Args)]
pub struct InfoCommand {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    data: &'a str,
    used_fallback: bool,
    failures: &'a [LoadFailure],
    match_mode: SubUnitMatchMode,
    summary: SelectionSummary,
    name_keys: &'a NameKeyTable,
    full_extent: Option<Bounds>,
    focus: Option<FocusTarget>,
}

impl InfoCommand {
    /// Load the data, apply the selection and print the report.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected name is not offered at its level, or if
    /// writing the output fails.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let mut ctx = CommandContext::load(config).await?;
        self.selection.apply(&mut ctx.session)?;

        let report = InfoReport {
            data: &ctx.config.data,
            used_fallback: ctx.report.used_fallback,
            failures: &ctx.report.failures,
            match_mode: ctx.session.match_mode(),
            summary: ctx.session.summary(),
            name_keys: ctx.session.name_keys(),
            full_extent: ctx.session.full_extent(),
            focus: ctx.session.focus_target(),
        };

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            }
            OutputFormat::Text => write_report(&mut out, &report)?,
        }
        Ok(())
    }
}

fn write_report<W: Write>(out: &mut W, report: &InfoReport<'_>) -> Result<()> {
    let summary = &report.summary;
    let unset = || "-".bright_black().to_string();

    writeln!(out, "{}", "Selection".cyan().bold())?;
    writeln!(out, "  District: {}", summary.district.clone().unwrap_or_else(unset))?;
    writeln!(out, "  SS:       {}", summary.subunit.clone().unwrap_or_else(unset))?;
    writeln!(out, "  Village:  {}", summary.village_label.clone().unwrap_or_else(unset))?;
    if let Some(area) = summary.area_km2 {
        writeln!(out, "  Area:     {area:.2} km²")?;
    }
    if let Some(focus) = &report.focus {
        let bounds = focus.bounds.map_or_else(unset, |b| b.to_string());
        writeln!(out, "  Focus:    {} {} {}", focus.level.label(), focus.feature, bounds)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "Data".cyan().bold())?;
    if report.used_fallback {
        let note = "(fallback)".bright_black();
        writeln!(out, "  Source:   {} {}", "built-in sample".yellow(), note)?;
        for failure in report.failures {
            let level = failure.level.label().bright_black();
            writeln!(out, "            {} {}", level, failure.reason)?;
        }
    } else {
        writeln!(out, "  Source:   {}", report.data)?;
    }
    writeln!(
        out,
        "  Features: {} districts, {} sub-units, {} villages",
        summary.totals.districts, summary.totals.subunits, summary.totals.villages
    )?;
    if let Some(extent) = report.full_extent {
        writeln!(out, "  Extent:   {extent}")?;
    }
    writeln!(out, "  Matching: {}", report.match_mode)?;

    writeln!(out)?;
    writeln!(out, "{}", "Name keys".cyan().bold())?;
    let keys = report.name_keys;
    writeln!(out, "  District: {}", keys.district)?;
    writeln!(out, "  SS:       {} (district ref: {})", keys.subunit, keys.subunit_district_ref)?;
    writeln!(
        out,
        "  Village:  {} (district ref: {}, SS ref: {})",
        keys.village, keys.village_district_ref, keys.village_subunit_ref
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LoadReport;
    use crate::session::Session;
    use crate::test_utils::scenario_catalog;

    #[test]
    fn test_text_report() {
        colored::control::set_override(false);
        let mut session = Session::new(scenario_catalog());
        session.on_search("satj");
        let load = LoadReport::default();

        let report = InfoReport {
            data: "data",
            used_fallback: load.used_fallback,
            failures: &load.failures,
            match_mode: session.match_mode(),
            summary: session.summary(),
            name_keys: session.name_keys(),
            full_extent: session.full_extent(),
            focus: session.focus_target(),
        };

        let mut buffer = Vec::new();
        write_report(&mut buffer, &report).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("Village:  Satjelia"));
        assert!(text.contains("Area:     2.50 km²"));
        assert!(text.contains("Source:   data"));
        assert!(text.contains("1 districts, 1 sub-units, 2 villages"));
        assert!(text.contains("Matching: district-scoped"));
        assert!(text.contains("District: district"));
        assert!(text.contains("SS:       subdistric | subdistric_name"));
    }
}
