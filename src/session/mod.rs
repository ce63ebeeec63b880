//! Navigation session
//!
//! A [`Session`] is the application context of one user: it owns the loaded
//! catalog, the name keys resolved for it, the selection machine, the
//! sub-unit match mode, the latest search hits and the layer visibility flag.
//!
//! Every inbound event (a choice from a list, a click on a rendered feature,
//! a search, a reset) goes through one method and produces a [`ViewUpdate`]:
//! the recomputed choice lists and highlight sets a renderer needs to bring
//! its display in line with the selection.
//!
//! # Examples
//!
//! ```rust,no_run
//! use admap_cli::catalog::fallback::fallback_catalog;
//! use admap_cli::session::Session;
//!
//! let mut session = Session::new(fallback_catalog()?);
//! session.on_district_chosen(Some("24 Paraganas South"));
//! let update = session.on_subunit_chosen(Some("Basanti"));
//! assert_eq!(update.options.villages.values(), vec!["Kumirmari", "Satjelia"]);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::BTreeSet;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::cascade::CascadeOptions;
use crate::catalog::{CatalogTotals, FeatureCatalog};
use crate::constants::AREA_KEY;
use crate::core::{AdmapError, HierarchyLevel};
use crate::geojson::{Bounds, FeatureId};
use crate::highlight::{HighlightSet, SubUnitMatchMode};
use crate::properties::{NameKeyTable, ancestor_name, clean_name, display_name};
use crate::search::{SearchOutcome, search_villages};
use crate::selection::{SelectionMachine, SelectionState};

/// Everything a renderer needs after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewUpdate {
    pub selection: SelectionState,
    pub options: CascadeOptions,
    pub highlights: HighlightSet,
    /// Villages matched by the latest search, shown apart from the selection
    pub search_hits: BTreeSet<FeatureId>,
    pub layers_visible: bool,
    /// Whether "zoom to selection" has anything to zoom to
    pub zoom_enabled: bool,
    /// Name keys the lists and highlights were computed with
    #[serde(skip)]
    pub keys: NameKeyTable,
}

/// Selected names plus catalog totals, for an information panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub district: Option<String>,
    pub subunit: Option<String>,
    pub village: Option<String>,
    /// Clean label of the selected village
    pub village_label: Option<String>,
    pub area_km2: Option<f64>,
    pub totals: CatalogTotals,
}

/// Feature to bring into view for "zoom to selection".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FocusTarget {
    pub level: HierarchyLevel,
    pub feature: FeatureId,
    pub bounds: Option<Bounds>,
}

/// One user's navigation state over a loaded catalog.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: FeatureCatalog,
    keys: NameKeyTable,
    machine: SelectionMachine,
    match_mode: SubUnitMatchMode,
    search_hits: BTreeSet<FeatureId>,
    layers_visible: bool,
}

impl Session {
    /// Start an empty-selection session over `catalog`.
    #[must_use]
    pub fn new(catalog: FeatureCatalog) -> Self {
        let keys = NameKeyTable::resolve(&catalog);
        Self {
            catalog,
            keys,
            machine: SelectionMachine::new(),
            match_mode: SubUnitMatchMode::default(),
            search_hits: BTreeSet::new(),
            layers_visible: true,
        }
    }

    #[must_use]
    pub fn with_match_mode(mut self, mode: SubUnitMatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn name_keys(&self) -> &NameKeyTable {
        &self.keys
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        self.machine.state()
    }

    #[must_use]
    pub const fn match_mode(&self) -> SubUnitMatchMode {
        self.match_mode
    }

    /// Current options, highlights and search hits.
    #[must_use]
    pub fn view(&self) -> ViewUpdate {
        let state = self.machine.state();
        ViewUpdate {
            selection: state.clone(),
            options: CascadeOptions::build(&self.catalog, &self.keys, state),
            highlights: HighlightSet::project(&self.catalog, &self.keys, state, self.match_mode),
            search_hits: self.search_hits.clone(),
            layers_visible: self.layers_visible,
            zoom_enabled: !state.is_empty(),
            keys: self.keys.clone(),
        }
    }

    pub fn on_district_chosen(&mut self, name: Option<&str>) -> ViewUpdate {
        self.machine.select_district(name);
        self.view()
    }

    pub fn on_subunit_chosen(&mut self, name: Option<&str>) -> ViewUpdate {
        if !self.machine.select_subunit(name) {
            debug!("Ignoring sub-unit choice {:?} without a district", name);
        }
        self.view()
    }

    pub fn on_village_chosen(&mut self, name: Option<&str>) -> ViewUpdate {
        if !self.machine.select_village(name) {
            debug!("Ignoring village choice {:?} without a sub-unit", name);
        }
        self.view()
    }

    /// Dispatch a list choice to the handler for `level`.
    pub fn on_chosen(&mut self, level: HierarchyLevel, name: Option<&str>) -> ViewUpdate {
        match level {
            HierarchyLevel::District => self.on_district_chosen(name),
            HierarchyLevel::SubUnit => self.on_subunit_chosen(name),
            HierarchyLevel::Village => self.on_village_chosen(name),
        }
    }

    /// Select a rendered feature and its ancestors.
    ///
    /// Ancestor names are read from the feature's own properties; a level is
    /// only re-selected when it differs from the current choice, so clicking a
    /// sibling village keeps the sub-unit in place. A missing ancestor name
    /// leaves that level as it is.
    ///
    /// # Errors
    ///
    /// Returns [`AdmapError::FeatureNotFound`] if `id` is not in the level's
    /// collection.
    pub fn on_feature_clicked(
        &mut self,
        level: HierarchyLevel,
        id: FeatureId,
    ) -> Result<ViewUpdate> {
        let feature = self.catalog.feature(level, id).ok_or(AdmapError::FeatureNotFound {
            level,
            id: id.0,
        })?;

        let district = ancestor_name(feature, &self.keys, level, HierarchyLevel::District)
            .map(str::to_string);
        let subunit = ancestor_name(feature, &self.keys, level, HierarchyLevel::SubUnit)
            .map(str::to_string);
        let own = display_name(feature, &self.keys, level).map(str::to_string);

        if district.is_some() && self.machine.state().district() != district.as_deref() {
            self.machine.select_district(district.as_deref());
        }
        if subunit.is_some() && self.machine.state().subunit() != subunit.as_deref() {
            self.machine.select_subunit(subunit.as_deref());
        }
        if let Some(own) = own.as_deref() {
            self.machine.select(level, Some(own));
        }

        debug!("Clicked {} {}: selection now {:?}", level, id, self.machine.state());
        Ok(self.view())
    }

    /// Search villages; a unique hit is selected along its full path.
    ///
    /// Returns `None` for a blank query and leaves the session untouched.
    pub fn on_search(&mut self, query: &str) -> Option<SearchOutcome> {
        let outcome = search_villages(query, &self.catalog, &self.keys)?;
        self.search_hits = outcome.hits().into_iter().collect();

        if let SearchOutcome::Unique { path, .. } = &outcome {
            self.machine.select_district(path.district.as_deref());
            self.machine.select_subunit(path.subunit.as_deref());
            self.machine.select_village(path.village.as_deref());
        }

        Some(outcome)
    }

    /// Clear the selection and search hits.
    pub fn reset(&mut self) -> ViewUpdate {
        self.machine.reset();
        self.search_hits.clear();
        self.view()
    }

    /// Swap in a freshly loaded catalog; resolves keys again and resets.
    pub fn reload(&mut self, catalog: FeatureCatalog) -> ViewUpdate {
        self.keys = NameKeyTable::resolve(&catalog);
        self.catalog = catalog;
        self.reset()
    }

    /// Flip layer visibility and return the new value.
    pub fn toggle_layers(&mut self) -> bool {
        self.layers_visible = !self.layers_visible;
        self.layers_visible
    }

    #[must_use]
    pub fn summary(&self) -> SelectionSummary {
        let state = self.machine.state();
        let village_feature = state.village().and_then(|name| {
            self.catalog
                .villages
                .features
                .iter()
                .find(|f| display_name(f, &self.keys, HierarchyLevel::Village) == Some(name))
        });

        SelectionSummary {
            district: state.district().map(str::to_string),
            subunit: state.subunit().map(str::to_string),
            village: state.village().map(str::to_string),
            village_label: village_feature
                .and_then(|f| clean_name(f, &self.keys))
                .map(str::to_string),
            area_km2: village_feature.and_then(|f| f.number(AREA_KEY)),
            totals: self.catalog.totals(),
        }
    }

    /// First highlighted feature of the deepest selected level.
    #[must_use]
    pub fn focus_target(&self) -> Option<FocusTarget> {
        let state = self.machine.state();
        let level = state.deepest()?;
        let highlights = HighlightSet::project(&self.catalog, &self.keys, state, self.match_mode);
        let feature = *highlights.ids(level).first()?;

        Some(FocusTarget {
            level,
            feature,
            bounds: self.catalog.feature(level, feature).and_then(|f| f.bounds()),
        })
    }

    /// Bounding box of all villages.
    #[must_use]
    pub fn full_extent(&self) -> Option<Bounds> {
        self.catalog.villages.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback::fallback_catalog;
    use crate::test_utils::{CatalogBuilder, init_test_logging, scenario_catalog};

    #[test]
    fn test_gosaba_walkthrough() {
        init_test_logging(None);
        let mut session = Session::new(scenario_catalog());

        let update = session.on_district_chosen(Some("Gosaba Block"));
        assert_eq!(update.options.subunits.values(), vec!["Basanti"]);
        assert!(update.zoom_enabled);

        let update = session.on_subunit_chosen(Some("Basanti"));
        assert_eq!(update.options.villages.values(), vec!["Kumirmari", "Satjelia"]);

        let update = session.on_village_chosen(Some("Satjelia"));
        assert_eq!(update.highlights.villages, BTreeSet::from([FeatureId(0)]));
        assert_eq!(update.highlights.districts, BTreeSet::from([FeatureId(0)]));

        let summary = session.summary();
        assert_eq!(summary.village.as_deref(), Some("Satjelia"));
        assert_eq!(summary.area_km2, Some(2.5));
        assert_eq!(summary.totals.villages, 2);
    }

    #[test]
    fn test_orphan_choice_is_ignored() {
        let mut session = Session::new(scenario_catalog());
        let update = session.on_subunit_chosen(Some("Basanti"));
        assert!(update.selection.is_empty());
        assert!(update.highlights.is_empty());
        assert!(!update.zoom_enabled);
    }

    #[test]
    fn test_click_village_selects_ancestors() {
        let mut session = Session::new(fallback_catalog().unwrap());
        let update = session.on_feature_clicked(HierarchyLevel::Village, FeatureId(2)).unwrap();

        assert_eq!(update.selection.district(), Some("24 Paraganas South"));
        assert_eq!(update.selection.subunit(), Some("Gosaba"));
        assert_eq!(update.selection.village(), Some("Lahiripur"));
        assert_eq!(update.highlights.subunits, BTreeSet::from([FeatureId(1)]));
    }

    #[test]
    fn test_click_sibling_keeps_parents() {
        let mut session = Session::new(fallback_catalog().unwrap());
        session.on_feature_clicked(HierarchyLevel::Village, FeatureId(0)).unwrap();
        let update = session.on_feature_clicked(HierarchyLevel::Village, FeatureId(1)).unwrap();
        assert_eq!(update.selection.subunit(), Some("Basanti"));
        assert_eq!(update.selection.village(), Some("Kumirmari"));
    }

    #[test]
    fn test_click_subunit_and_district() {
        let mut session = Session::new(fallback_catalog().unwrap());
        let update = session.on_feature_clicked(HierarchyLevel::SubUnit, FeatureId(0)).unwrap();
        assert_eq!(update.selection.district(), Some("24 Paraganas South"));
        assert_eq!(update.selection.subunit(), Some("Basanti"));

        let update = session.on_feature_clicked(HierarchyLevel::District, FeatureId(0)).unwrap();
        assert_eq!(update.selection.district(), Some("24 Paraganas South"));
        assert_eq!(update.selection.subunit(), None);
    }

    #[test]
    fn test_click_unknown_feature_fails() {
        let mut session = Session::new(scenario_catalog());
        let err = session.on_feature_clicked(HierarchyLevel::Village, FeatureId(99)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdmapError>(),
            Some(AdmapError::FeatureNotFound { id: 99, .. })
        ));
    }

    #[test]
    fn test_unique_search_selects_path() {
        let mut session = Session::new(scenario_catalog());
        let outcome = session.on_search("kumir").unwrap();
        assert!(matches!(outcome, SearchOutcome::Unique { .. }));

        let update = session.view();
        assert_eq!(update.selection.village(), Some("Kumirmari"));
        assert_eq!(update.search_hits, BTreeSet::from([FeatureId(1)]));
        assert_eq!(update.highlights.villages, BTreeSet::from([FeatureId(1)]));
    }

    #[test]
    fn test_ambiguous_search_records_hits_only() {
        let mut session = Session::new(scenario_catalog());
        let outcome = session.on_search("i").unwrap();
        assert!(matches!(outcome, SearchOutcome::Ambiguous { count: 2, .. }));
        assert!(session.selection().is_empty());
        assert_eq!(session.view().search_hits.len(), 2);
    }

    #[test]
    fn test_blank_search_changes_nothing() {
        let mut session = Session::new(scenario_catalog());
        session.on_search("kumir");
        assert!(session.on_search("  ").is_none());
        assert_eq!(session.view().search_hits.len(), 1);
    }

    #[test]
    fn test_reset_clears_selection_and_hits() {
        let mut session = Session::new(scenario_catalog());
        session.on_search("kumir");
        let update = session.reset();
        assert!(update.selection.is_empty());
        assert!(update.search_hits.is_empty());
        assert!(update.highlights.is_empty());
    }

    #[test]
    fn test_reload_resolves_keys_again() {
        let mut session = Session::new(scenario_catalog());
        session.on_district_chosen(Some("Gosaba Block"));

        let other = CatalogBuilder::new().build();
        let update = session.reload(other);
        assert!(update.selection.is_empty());
        assert_eq!(session.name_keys().district.primary(), Some("DISTRICT"));
    }

    #[test]
    fn test_focus_and_extent() {
        let mut session = Session::new(scenario_catalog());
        assert!(session.focus_target().is_none());

        session.on_district_chosen(Some("Gosaba Block"));
        session.on_subunit_chosen(Some("Basanti"));
        let target = session.focus_target().unwrap();
        assert_eq!(target.level, HierarchyLevel::SubUnit);
        assert_eq!(target.feature, FeatureId(0));
        assert!(target.bounds.is_some());

        let extent = session.full_extent().unwrap();
        assert_eq!(extent.min_lon, 88.0);
        assert_eq!(extent.max_lon, 88.5);
    }

    #[test]
    fn test_toggle_layers() {
        let mut session = Session::new(scenario_catalog());
        assert!(session.view().layers_visible);
        assert!(!session.toggle_layers());
        assert!(!session.view().layers_visible);
        assert!(session.toggle_layers());
    }

    #[test]
    fn test_unscoped_mode_is_carried() {
        let session = Session::new(scenario_catalog()).with_match_mode(SubUnitMatchMode::Unscoped);
        assert_eq!(session.match_mode(), SubUnitMatchMode::Unscoped);
    }
}
