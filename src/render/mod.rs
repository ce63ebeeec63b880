//! Rendering adapters
//!
//! The engine never draws anything. A [`Renderer`] receives each
//! [`ViewUpdate`] together with the catalog and applies it to whatever
//! display it owns. Two renderers ship with admap:
//!
//! - [`TerminalRenderer`]: colored text sections for the three choice lists,
//!   the highlighted features per level, and the search hits
//! - [`JsonRenderer`]: one JSON document per update, for scripting
//!
//! Both write to any [`Write`] so tests can render into a `Vec<u8>`.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::cascade::ChoiceList;
use crate::catalog::FeatureCatalog;
use crate::core::HierarchyLevel;
use crate::geojson::FeatureId;
use crate::properties::{NameKeyTable, display_name};
use crate::selection::SelectionState;
use crate::session::ViewUpdate;

/// Applies view updates to a display.
pub trait Renderer {
    /// Bring the display in line with `update`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn render(&mut self, update: &ViewUpdate, catalog: &FeatureCatalog) -> Result<()>;
}

/// A feature id with its display name, as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedFeature {
    pub id: FeatureId,
    pub name: Option<String>,
}

fn named(
    ids: &BTreeSet<FeatureId>,
    catalog: &FeatureCatalog,
    keys: &NameKeyTable,
    level: HierarchyLevel,
) -> Vec<NamedFeature> {
    ids.iter()
        .map(|&id| NamedFeature {
            id,
            name: catalog
                .feature(level, id)
                .and_then(|f| display_name(f, keys, level))
                .map(str::to_string),
        })
        .collect()
}

/// Colored text output.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_list(&mut self, list: &ChoiceList, selected: Option<&str>) -> Result<()> {
        let heading = list.level.label().cyan().bold();
        if !list.enabled {
            writeln!(self.out, "{} {}", heading, "(disabled)".bright_black())?;
            return Ok(());
        }

        writeln!(self.out, "{} ({} options)", heading, list.len())?;
        for option in &list.options {
            if Some(option.value.as_str()) == selected {
                writeln!(self.out, "  {} {}", "▸".green(), option.label.green().bold())?;
            } else {
                writeln!(self.out, "    {}", option.label)?;
            }
        }
        Ok(())
    }

    fn write_selection(&mut self, selection: &SelectionState) -> Result<()> {
        if selection.is_empty() {
            writeln!(self.out, "{}", "No selection made yet".bright_black())?;
            return Ok(());
        }
        for level in HierarchyLevel::all() {
            if let Some(name) = selection.get(*level) {
                writeln!(self.out, "{}: {}", level.label().bold(), name)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, update: &ViewUpdate, catalog: &FeatureCatalog) -> Result<()> {
        self.write_selection(&update.selection)?;
        writeln!(self.out)?;

        for level in HierarchyLevel::all() {
            self.write_list(update.options.list(*level), update.selection.get(*level))?;
        }

        if !update.highlights.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "{}", "Highlighted".yellow().bold())?;
            for level in HierarchyLevel::all() {
                for feature in named(update.highlights.ids(*level), catalog, &update.keys, *level) {
                    writeln!(
                        self.out,
                        "  {} {} {}",
                        level.label(),
                        feature.id.to_string().bright_black(),
                        feature.name.as_deref().unwrap_or("?")
                    )?;
                }
            }
        }

        if !update.search_hits.is_empty() {
            writeln!(self.out)?;
            let heading = "Search hits".magenta().bold();
            writeln!(self.out, "{} ({})", heading, update.search_hits.len())?;
            for feature in
                named(&update.search_hits, catalog, &update.keys, HierarchyLevel::Village)
            {
                writeln!(
                    self.out,
                    "  {} {}",
                    feature.id.to_string().bright_black(),
                    feature.name.as_deref().unwrap_or("?")
                )?;
            }
        }

        if !update.layers_visible {
            writeln!(self.out, "{}", "Layers hidden".bright_black())?;
        }

        self.out.flush()?;
        Ok(())
    }
}

/// Serializable form of a [`ViewUpdate`] with feature names resolved.
#[derive(Debug, Serialize)]
pub struct RenderedView<'a> {
    pub selection: &'a SelectionState,
    pub options: &'a crate::cascade::CascadeOptions,
    pub highlighted: HighlightedNames,
    pub search_hits: Vec<NamedFeature>,
    pub layers_visible: bool,
    pub zoom_enabled: bool,
}

/// Highlighted features per level.
#[derive(Debug, Serialize)]
pub struct HighlightedNames {
    pub districts: Vec<NamedFeature>,
    pub subunits: Vec<NamedFeature>,
    pub villages: Vec<NamedFeature>,
}

impl<'a> RenderedView<'a> {
    #[must_use]
    pub fn new(update: &'a ViewUpdate, catalog: &FeatureCatalog) -> Self {
        let keys = &update.keys;
        Self {
            selection: &update.selection,
            options: &update.options,
            highlighted: HighlightedNames {
                districts: named(
                    &update.highlights.districts,
                    catalog,
                    keys,
                    HierarchyLevel::District,
                ),
                subunits: named(
                    &update.highlights.subunits,
                    catalog,
                    keys,
                    HierarchyLevel::SubUnit,
                ),
                villages: named(
                    &update.highlights.villages,
                    catalog,
                    keys,
                    HierarchyLevel::Village,
                ),
            },
            search_hits: named(&update.search_hits, catalog, keys, HierarchyLevel::Village),
            layers_visible: update.layers_visible,
            zoom_enabled: update.zoom_enabled,
        }
    }
}

/// One pretty-printed JSON document per update.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, update: &ViewUpdate, catalog: &FeatureCatalog) -> Result<()> {
        let view = RenderedView::new(update, catalog);
        serde_json::to_writer_pretty(&mut self.out, &view)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
