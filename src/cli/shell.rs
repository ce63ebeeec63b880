//! Interactive navigation shell.
//!
//! Reads one command per line and prints the view after every change, so a
//! terminal session behaves like the three drop-downs, the map clicks and the
//! buttons of a graphical front end.
//!
//! ```text
//! admap> district 24 Paraganas South
//! admap> ss Basanti
//! admap> village Kumirmari
//! admap> click village 2
//! admap> search sat
//! admap> zoom
//! admap> reset
//! ```
//!
//! Errors inside the shell (an unknown name, a bad feature id) are printed
//! and the session continues.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::time::Duration;

use super::CliConfig;
use super::common::{CommandContext, OutputFormat, choose_checked};
use super::search::print_outcome;
use crate::catalog::{DataSource, load_catalog};
use crate::core::{AdmapError, HierarchyLevel, user_friendly_error};
use crate::geojson::FeatureId;
use crate::render::Renderer;
use crate::session::Session;

const PROMPT: &str = "admap> ";

const HELP: &str = "\
Commands:
  district [name]        Choose a district (no name clears it)
  subunit|ss [name]      Choose a sub-unit of the selected district
  village [name]         Choose a village of the selected sub-unit
  click <level> <id>     Select a feature as if clicked on the map
  search <text>          Search villages by name
  reset                  Clear the selection and search hits
  zoom                   Show the extent of the deepest selection
  fit                    Show the extent of all villages
  layers                 Toggle layer visibility
  show                   Print the current view
  info                   Print the selection summary
  reload                 Load the data again and reset
  help                   Show this help
  quit|exit              Leave the shell";

/// Command to start an interactive session on stdin/stdout.
#[derive(Args)]
pub struct ShellCommand {
    /// Output format for views
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ShellCommand {
    /// Load the data and run the shell until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the data fails or stdin/stdout break.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let mut ctx = CommandContext::load(config).await?;
        let source = ctx.config.source()?;
        let timeout = ctx.config.fetch_timeout();

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut shell = Shell::new(&mut ctx.session, self.format, stdout.lock());
        shell.run(stdin.lock(), &source, timeout).await
    }
}

/// Result of one input line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Line interpreter bound to a session and an output stream.
pub struct Shell<'a, W: Write> {
    session: &'a mut Session,
    format: OutputFormat,
    out: W,
}

impl<'a, W: Write> Shell<'a, W> {
    pub fn new(session: &'a mut Session, format: OutputFormat, out: W) -> Self {
        Self {
            session,
            format,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Interpret lines from `input` until `quit` or end of input.
    ///
    /// `source` and `timeout` are used by the `reload` command.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Errors of
    /// individual commands are printed and do not end the loop.
    pub async fn run<R: BufRead, S: DataSource>(
        &mut self,
        input: R,
        source: &S,
        timeout: Duration,
    ) -> Result<()> {
        writeln!(self.out, "{}", "Type 'help' for commands".bright_black())?;
        let mut lines = input.lines();

        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                break;
            };
            let line = line.context("Failed to read shell input")?;

            let result = if line.trim() == "reload" {
                self.reload(source, timeout).await.map(|()| Flow::Continue)
            } else {
                self.handle_line(&line)
            };

            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    let friendly = user_friendly_error(e);
                    writeln!(self.out, "{}: {}", "error".red().bold(), friendly)?;
                }
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command.to_lowercase().as_str() {
            "" => {}
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" | "?" => writeln!(self.out, "{HELP}")?,
            "district" => self.choose(HierarchyLevel::District, rest)?,
            "subunit" | "ss" => self.choose(HierarchyLevel::SubUnit, rest)?,
            "village" => self.choose(HierarchyLevel::Village, rest)?,
            "click" => self.click(rest)?,
            "search" => self.search(rest)?,
            "reset" => {
                self.session.reset();
                self.show()?;
            }
            "zoom" => self.zoom()?,
            "fit" => match self.session.full_extent() {
                Some(extent) => writeln!(self.out, "Full extent {extent}")?,
                None => writeln!(self.out, "{}", "No village geometry loaded".bright_black())?,
            },
            "layers" => {
                let visible = self.session.toggle_layers();
                writeln!(self.out, "Layers {}", if visible { "shown" } else { "hidden" })?;
            }
            "show" => self.show()?,
            "info" => self.info()?,
            other => {
                return Err(AdmapError::InvalidArgument {
                    message: format!("Unknown command '{other}', type 'help' for commands"),
                }
                .into());
            }
        }
        Ok(Flow::Continue)
    }

    fn show(&mut self) -> Result<()> {
        let update = self.session.view();
        self.format.renderer(&mut self.out).render(&update, self.session.catalog())
    }

    fn choose(&mut self, level: HierarchyLevel, name: &str) -> Result<()> {
        if name.is_empty() {
            self.session.on_chosen(level, None);
        } else {
            choose_checked(self.session, level, name)?;
        }
        self.show()
    }

    fn click(&mut self, args: &str) -> Result<()> {
        let mut parts = args.split_whitespace();
        let (Some(level), Some(id), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AdmapError::InvalidArgument {
                message: "usage: click <level> <id>".to_string(),
            }
            .into());
        };

        let level: HierarchyLevel = level.parse()?;
        let id: usize = id.trim_start_matches('#').parse().map_err(|_| AdmapError::InvalidArgument {
            message: format!("'{id}' is not a feature id"),
        })?;

        self.session.on_feature_clicked(level, FeatureId(id))?;
        self.show()
    }

    fn search(&mut self, query: &str) -> Result<()> {
        let Some(outcome) = self.session.on_search(query) else {
            writeln!(self.out, "{}", "Enter a village name to search".yellow())?;
            return Ok(());
        };
        print_outcome(&mut self.out, &outcome)?;
        self.show()
    }

    fn zoom(&mut self) -> Result<()> {
        match self.session.focus_target() {
            Some(target) => {
                let bounds = target.bounds.map_or("(no geometry)".to_string(), |b| b.to_string());
                let label = target.level.label();
                writeln!(self.out, "Zoom to {} {} {}", label, target.feature, bounds)?;
            }
            None => writeln!(self.out, "{}", "Nothing selected to zoom to".bright_black())?,
        }
        Ok(())
    }

    fn info(&mut self) -> Result<()> {
        let summary = self.session.summary();
        let value = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

        writeln!(self.out, "District: {}", value(summary.district))?;
        writeln!(self.out, "SS:       {}", value(summary.subunit))?;
        writeln!(self.out, "Village:  {}", value(summary.village_label))?;
        if let Some(area) = summary.area_km2 {
            writeln!(self.out, "Area:     {area:.2} km²")?;
        }
        writeln!(
            self.out,
            "Totals:   {} districts, {} sub-units, {} villages",
            summary.totals.districts, summary.totals.subunits, summary.totals.villages
        )?;
        Ok(())
    }

    async fn reload<S: DataSource>(&mut self, source: &S, timeout: Duration) -> Result<()> {
        let (catalog, report) = load_catalog(source, timeout).await?;
        if report.used_fallback {
            writeln!(
                self.out,
                "{}: reload failed, using built-in sample data",
                "warning".yellow().bold()
            )?;
        }
        self.session.reload(catalog);
        self.show()
    }
}
