//! Cascade option builder
//!
//! Computes the three choice lists from the catalog and the current
//! selection. Selecting a parent narrows the choices below it:
//!
//! | List      | Source features                                   | Order                | Enabled when          |
//! |-----------|---------------------------------------------------|----------------------|-----------------------|
//! | District  | all district features                             | first appearance     | always                |
//! | Sub-unit  | sub-units referencing the selected district       | first appearance     | a district is chosen  |
//! | Village   | villages referencing the selected sub-unit and district | clean label    | a sub-unit is chosen  |
//!
//! Names are compared by exact string equality; empty and missing names are
//! skipped. Building options has no side effects, so calling it twice with
//! the same inputs gives the same lists.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::catalog::FeatureCatalog;
use crate::core::HierarchyLevel;
use crate::properties::{NameKeyTable, ancestor_name, clean_name, display_name};
use crate::selection::SelectionState;

/// One entry of a choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    /// Name as stored in the data; what selection uses
    pub value: String,
    /// Normalized label (villages); equals `value` elsewhere
    pub clean: String,
    /// Text to show
    pub label: String,
}

impl ChoiceOption {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            clean: value.to_string(),
            label: value.to_string(),
        }
    }

    /// Village entry: label is `"{clean} ({value})"` when the two differ.
    #[must_use]
    pub fn village(value: &str, clean: &str) -> Self {
        let label =
            if clean == value { clean.to_string() } else { format!("{clean} ({value})") };
        Self {
            value: value.to_string(),
            clean: clean.to_string(),
            label,
        }
    }
}

/// Options of one level plus whether the control accepts input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceList {
    pub level: HierarchyLevel,
    pub enabled: bool,
    pub options: Vec<ChoiceOption>,
}

impl ChoiceList {
    fn disabled(level: HierarchyLevel) -> Self {
        Self {
            level,
            enabled: false,
            options: Vec::new(),
        }
    }

    /// Option values in list order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Most similar option value, if any is close enough to be a likely typo.
    #[must_use]
    pub fn closest(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.options
            .iter()
            .map(|o| (strsim::jaro_winkler(&wanted, &o.value.to_lowercase()), o.value.as_str()))
            .filter(|(score, _)| *score >= 0.8)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map(|(_, value)| value)
    }
}

/// The three choice lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeOptions {
    pub districts: ChoiceList,
    pub subunits: ChoiceList,
    pub villages: ChoiceList,
}

impl CascadeOptions {
    /// Build all lists for the current selection.
    #[must_use]
    pub fn build(catalog: &FeatureCatalog, table: &NameKeyTable, state: &SelectionState) -> Self {
        let options = Self {
            districts: district_options(catalog, table),
            subunits: subunit_options(catalog, table, state),
            villages: village_options(catalog, table, state),
        };
        debug!(
            "Options: {} districts, {} sub-units, {} villages",
            options.districts.len(),
            options.subunits.len(),
            options.villages.len()
        );
        options
    }

    #[must_use]
    pub const fn list(&self, level: HierarchyLevel) -> &ChoiceList {
        match level {
            HierarchyLevel::District => &self.districts,
            HierarchyLevel::SubUnit => &self.subunits,
            HierarchyLevel::Village => &self.villages,
        }
    }
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<ChoiceOption> {
    let mut seen = HashSet::new();
    names.filter(|name| seen.insert(*name)).map(ChoiceOption::plain).collect()
}

fn district_options(catalog: &FeatureCatalog, table: &NameKeyTable) -> ChoiceList {
    let names = catalog
        .districts
        .features
        .iter()
        .filter_map(|f| display_name(f, table, HierarchyLevel::District));
    ChoiceList {
        level: HierarchyLevel::District,
        enabled: true,
        options: distinct(names),
    }
}

fn subunit_options(
    catalog: &FeatureCatalog,
    table: &NameKeyTable,
    state: &SelectionState,
) -> ChoiceList {
    let Some(district) = state.district() else {
        return ChoiceList::disabled(HierarchyLevel::SubUnit);
    };

    let names = catalog
        .subunits
        .features
        .iter()
        .filter(|f| {
            ancestor_name(f, table, HierarchyLevel::SubUnit, HierarchyLevel::District)
                == Some(district)
        })
        .filter_map(|f| display_name(f, table, HierarchyLevel::SubUnit));

    ChoiceList {
        level: HierarchyLevel::SubUnit,
        enabled: true,
        options: distinct(names),
    }
}

fn village_options(
    catalog: &FeatureCatalog,
    table: &NameKeyTable,
    state: &SelectionState,
) -> ChoiceList {
    let (Some(district), Some(subunit)) = (state.district(), state.subunit()) else {
        return ChoiceList::disabled(HierarchyLevel::Village);
    };

    let mut seen = HashSet::new();
    let mut options: Vec<ChoiceOption> = catalog
        .villages
        .features
        .iter()
        .filter(|f| {
            ancestor_name(f, table, HierarchyLevel::Village, HierarchyLevel::SubUnit)
                == Some(subunit)
                && ancestor_name(f, table, HierarchyLevel::Village, HierarchyLevel::District)
                    == Some(district)
        })
        .filter_map(|f| {
            let value = display_name(f, table, HierarchyLevel::Village)?;
            let label = clean_name(f, table).unwrap_or(value);
            seen.insert(value).then(|| ChoiceOption::village(value, label))
        })
        .collect();

    options.sort_by(|a, b| collate(&a.clean, &b.clean).then_with(|| a.value.cmp(&b.value)));

    ChoiceList {
        level: HierarchyLevel::Village,
        enabled: true,
        options,
    }
}

/// Decompose, drop combining marks, lowercase.
fn fold(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

/// Label comparison: case- and accent-insensitive first, exact text breaks ties.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}
