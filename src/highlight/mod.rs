//! Highlight projector
//!
//! Turns the selection into three sets of [`FeatureId`]s, one per level. The
//! renderer decides what "highlighted" looks like; this module only decides
//! which features are.
//!
//! Sub-unit names are not unique across districts in real data, so the
//! sub-unit rule has two modes ([`SubUnitMatchMode`]):
//!
//! - `district-scoped` (default): name matches and the feature's district
//!   reference equals the selected district
//! - `unscoped`: name match only

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::FeatureCatalog;
use crate::core::{AdmapError, HierarchyLevel};
use crate::geojson::FeatureId;
use crate::properties::{NameKeyTable, ancestor_name, display_name};
use crate::selection::SelectionState;

/// How sub-unit features are matched against the selected sub-unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubUnitMatchMode {
    /// Name and district reference must both match
    #[default]
    DistrictScoped,
    /// Name alone decides
    Unscoped,
}

impl std::fmt::Display for SubUnitMatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DistrictScoped => write!(f, "district-scoped"),
            Self::Unscoped => write!(f, "unscoped"),
        }
    }
}

impl std::str::FromStr for SubUnitMatchMode {
    type Err = AdmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "district-scoped" | "scoped" => Ok(Self::DistrictScoped),
            "unscoped" => Ok(Self::Unscoped),
            _ => Err(AdmapError::InvalidMatchMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// Highlighted feature ids per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSet {
    pub districts: BTreeSet<FeatureId>,
    pub subunits: BTreeSet<FeatureId>,
    pub villages: BTreeSet<FeatureId>,
}

impl HighlightSet {
    /// Project the selection onto the catalog.
    #[must_use]
    pub fn project(
        catalog: &FeatureCatalog,
        table: &NameKeyTable,
        state: &SelectionState,
        mode: SubUnitMatchMode,
    ) -> Self {
        let districts = match state.district() {
            Some(name) => ids_named(catalog, table, HierarchyLevel::District, name),
            None => BTreeSet::new(),
        };

        let subunits = match state.subunit() {
            Some(name) => catalog
                .subunits
                .iter()
                .filter(|(_, f)| display_name(f, table, HierarchyLevel::SubUnit) == Some(name))
                .filter(|(_, f)| match mode {
                    SubUnitMatchMode::Unscoped => true,
                    SubUnitMatchMode::DistrictScoped => {
                        ancestor_name(f, table, HierarchyLevel::SubUnit, HierarchyLevel::District)
                            == state.district()
                    }
                })
                .map(|(id, _)| id)
                .collect(),
            None => BTreeSet::new(),
        };

        let villages = match state.village() {
            Some(name) => ids_named(catalog, table, HierarchyLevel::Village, name),
            None => BTreeSet::new(),
        };

        Self {
            districts,
            subunits,
            villages,
        }
    }

    #[must_use]
    pub const fn ids(&self, level: HierarchyLevel) -> &BTreeSet<FeatureId> {
        match level {
            HierarchyLevel::District => &self.districts,
            HierarchyLevel::SubUnit => &self.subunits,
            HierarchyLevel::Village => &self.villages,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty() && self.subunits.is_empty() && self.villages.is_empty()
    }
}

fn ids_named(
    catalog: &FeatureCatalog,
    table: &NameKeyTable,
    level: HierarchyLevel,
    name: &str,
) -> BTreeSet<FeatureId> {
    catalog
        .collection(level)
        .iter()
        .filter(|(_, f)| display_name(f, table, level) == Some(name))
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionMachine;
    use crate::test_utils::{CatalogBuilder, scenario_catalog};
    use std::str::FromStr;

    fn project(
        catalog: &FeatureCatalog,
        path: [Option<&str>; 3],
        mode: SubUnitMatchMode,
    ) -> HighlightSet {
        let table = NameKeyTable::resolve(catalog);
        let mut machine = SelectionMachine::new();
        machine.select_district(path[0]);
        machine.select_subunit(path[1]);
        machine.select_village(path[2]);
        HighlightSet::project(catalog, &table, machine.state(), mode)
    }

    #[test]
    fn test_empty_selection_highlights_nothing() {
        let set = project(&scenario_catalog(), [None, None, None], SubUnitMatchMode::default());
        assert!(set.is_empty());
    }

    #[test]
    fn test_gosaba_scenario_highlights() {
        let set = project(
            &scenario_catalog(),
            [Some("Gosaba Block"), Some("Basanti"), Some("Satjelia")],
            SubUnitMatchMode::DistrictScoped,
        );
        assert_eq!(set.districts, BTreeSet::from([FeatureId(0)]));
        assert_eq!(set.subunits, BTreeSet::from([FeatureId(0)]));
        assert_eq!(set.villages, BTreeSet::from([FeatureId(0)]));
    }

    #[test]
    fn test_district_only_highlights_district_level() {
        let path = [Some("Gosaba Block"), None, None];
        let set = project(&scenario_catalog(), path, SubUnitMatchMode::default());
        assert_eq!(set.districts.len(), 1);
        assert!(set.subunits.is_empty());
        assert!(set.villages.is_empty());
    }

    #[test]
    fn test_scoped_and_unscoped_differ_on_duplicate_names() {
        let catalog = CatalogBuilder::new()
            .district("North")
            .district("South")
            .subunit("Hill", "North")
            .subunit("Hill", "South")
            .build();

        let path = [Some("South"), Some("Hill"), None];
        let scoped = project(&catalog, path, SubUnitMatchMode::DistrictScoped);
        assert_eq!(scoped.subunits, BTreeSet::from([FeatureId(1)]));

        let unscoped = project(&catalog, path, SubUnitMatchMode::Unscoped);
        assert_eq!(unscoped.subunits, BTreeSet::from([FeatureId(0), FeatureId(1)]));
    }

    #[test]
    fn test_subunit_fallback_name_key() {
        // Second sub-unit only carries the documented fallback key
        let mut catalog = CatalogBuilder::new().district("North").subunit("Hill", "North").build();
        let mut props = crate::geojson::Properties::new();
        props.insert("subdistric_name".into(), "Dale".into());
        props.insert("district".into(), "North".into());
        let dale = crate::geojson::Feature::new(props, serde_json::Value::Null);
        catalog.subunits.features.push(dale);

        let path = [Some("North"), Some("Dale"), None];
        let set = project(&catalog, path, SubUnitMatchMode::DistrictScoped);
        assert_eq!(set.subunits, BTreeSet::from([FeatureId(1)]));
    }

    #[test]
    fn test_match_mode_parse_and_display() {
        assert_eq!(SubUnitMatchMode::from_str("unscoped").unwrap(), SubUnitMatchMode::Unscoped);
        assert_eq!(
            SubUnitMatchMode::from_str("District-Scoped").unwrap(),
            SubUnitMatchMode::DistrictScoped
        );
        assert!(SubUnitMatchMode::from_str("fuzzy").is_err());
        assert_eq!(SubUnitMatchMode::DistrictScoped.to_string(), "district-scoped");

        let json = serde_json::to_string(&SubUnitMatchMode::Unscoped).unwrap();
        assert_eq!(json, "\"unscoped\"");
    }
}
