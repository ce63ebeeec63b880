//! Shared plumbing for CLI commands

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::io::Write;

use crate::catalog::{LoadReport, load_catalog};
use crate::cli::CliConfig;
use crate::config::AdmapConfig;
use crate::core::{AdmapError, HierarchyLevel};
use crate::render::{JsonRenderer, Renderer, TerminalRenderer};
use crate::session::{Session, ViewUpdate};
use crate::utils::progress::Spinner;

/// Output format shared by the read-only commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Renderer writing to `out` in this format.
    pub fn renderer<'a, W: Write + 'a>(self, out: W) -> Box<dyn Renderer + 'a> {
        match self {
            Self::Text => Box::new(TerminalRenderer::new(out)),
            Self::Json => Box::new(JsonRenderer::new(out)),
        }
    }
}

/// `--district/--subunit/--village` arguments selecting a path up front.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// District to select
    #[arg(long)]
    pub district: Option<String>,

    /// Sub-unit to select (requires --district)
    #[arg(long, requires = "district")]
    pub subunit: Option<String>,

    /// Village to select (requires --subunit)
    #[arg(long, requires = "subunit")]
    pub village: Option<String>,
}

impl SelectionArgs {
    /// Select the given path, checking every name against the current choices.
    ///
    /// # Errors
    ///
    /// Returns [`AdmapError::UnknownOption`] (with the closest valid choice)
    /// for the first name that is not offered.
    pub fn apply(&self, session: &mut Session) -> Result<ViewUpdate> {
        let path = [
            (HierarchyLevel::District, self.district.as_deref()),
            (HierarchyLevel::SubUnit, self.subunit.as_deref()),
            (HierarchyLevel::Village, self.village.as_deref()),
        ];

        for (level, name) in path {
            let Some(name) = name else {
                break;
            };
            choose_checked(session, level, name)?;
        }

        Ok(session.view())
    }
}

/// Choose `name` at `level` if the current list offers it.
///
/// # Errors
///
/// Returns [`AdmapError::UnknownOption`] when it is not offered.
pub fn choose_checked(
    session: &mut Session,
    level: HierarchyLevel,
    name: &str,
) -> Result<ViewUpdate> {
    let view = session.view();
    let list = view.options.list(level);
    if !list.contains(name) {
        return Err(AdmapError::UnknownOption {
            level,
            name: name.to_string(),
            closest: list.closest(name).map(str::to_string),
        }
        .into());
    }
    Ok(session.on_chosen(level, Some(name)))
}

/// Loaded configuration and session for one command run.
#[derive(Debug)]
pub struct CommandContext {
    pub config: AdmapConfig,
    pub session: Session,
    pub report: LoadReport,
}

impl CommandContext {
    /// Read the configuration, apply flag overrides and load the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable configuration, or when the fallback
    /// dataset cannot be constructed.
    pub async fn load(cli: &CliConfig) -> Result<Self> {
        let config = cli.resolve_config().await?;
        let source = config.source()?;

        let spinner = Spinner::new("Loading geographic data...", !cli.no_progress);
        let loaded = load_catalog(&source, config.fetch_timeout()).await;
        let (catalog, report) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.context("Failed to load geographic data"));
            }
        };

        spinner.set_message("Resolving name keys...");
        let session = Session::new(catalog).with_match_mode(config.match_mode);
        spinner.finish_and_clear();

        if report.used_fallback {
            eprintln!(
                "{}: could not load data from {}, using built-in sample data",
                "warning".yellow().bold(),
                config.data
            );
            for failure in &report.failures {
                eprintln!("  {} {}", failure.level.label().bright_black(), failure.reason);
            }
        }

        Ok(Self {
            config,
            session,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::scenario_catalog;

    #[test]
    fn test_apply_valid_path() {
        let mut session = Session::new(scenario_catalog());
        let args = SelectionArgs {
            district: Some("Gosaba Block".into()),
            subunit: Some("Basanti".into()),
            village: Some("Kumirmari".into()),
        };
        let update = args.apply(&mut session).unwrap();
        assert_eq!(update.selection.village(), Some("Kumirmari"));
    }

    #[test]
    fn test_apply_rejects_unknown_with_suggestion() {
        let mut session = Session::new(scenario_catalog());
        let args = SelectionArgs {
            district: Some("Gosaba Block".into()),
            subunit: Some("Basnti".into()),
            village: None,
        };
        let err = args.apply(&mut session).unwrap_err();
        match err.downcast_ref::<AdmapError>() {
            Some(AdmapError::UnknownOption { level, closest, .. }) => {
                assert_eq!(*level, HierarchyLevel::SubUnit);
                assert_eq!(closest.as_deref(), Some("Basanti"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The valid prefix stays applied
        assert_eq!(session.selection().district(), Some("Gosaba Block"));
    }

    #[test]
    fn test_format_renderers() {
        let session = Session::new(scenario_catalog());
        let mut buffer = Vec::new();
        let mut renderer = OutputFormat::Json.renderer(&mut buffer);
        renderer.render(&session.view(), session.catalog()).unwrap();
        drop(renderer);
        assert!(String::from_utf8(buffer).unwrap().contains("\"zoom_enabled\": false"));
    }
}
