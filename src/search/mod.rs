//! Village search
//!
//! Case-insensitive substring search over village names. A village matches
//! when its display name or its clean label contains the trimmed query. A
//! single hit comes back with the full district / sub-unit / village path read
//! from the feature itself, so the caller can select it in one go; several
//! hits are reported without choosing between them.

use serde::Serialize;

use crate::catalog::FeatureCatalog;
use crate::core::HierarchyLevel;
use crate::geojson::{Feature, FeatureId};
use crate::properties::{NameKeyTable, ancestor_name, clean_name, display_name};

/// Ancestor chain of a village as recorded in its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionPath {
    pub district: Option<String>,
    pub subunit: Option<String>,
    pub village: Option<String>,
}

impl SelectionPath {
    /// Read the path of a village feature.
    #[must_use]
    pub fn of_village(feature: &Feature, table: &NameKeyTable) -> Self {
        let ancestor = |level| {
            ancestor_name(feature, table, HierarchyLevel::Village, level).map(str::to_string)
        };
        Self {
            district: ancestor(HierarchyLevel::District),
            subunit: ancestor(HierarchyLevel::SubUnit),
            village: display_name(feature, table, HierarchyLevel::Village).map(str::to_string),
        }
    }
}

impl std::fmt::Display for SelectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let part = |p: &Option<String>| p.clone().unwrap_or_else(|| "?".to_string());
        write!(f, "{} > {} > {}", part(&self.district), part(&self.subunit), part(&self.village))
    }
}

/// One matching village.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub feature: FeatureId,
    /// Clean label, or the display name when there is none
    pub label: String,
    pub path: SelectionPath,
}

/// Result of a non-empty query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum SearchOutcome {
    /// Nothing matched
    NotFound {
        query: String,
    },
    /// Exactly one village matched
    Unique {
        feature: FeatureId,
        path: SelectionPath,
    },
    /// Several villages matched; nothing is selected
    Ambiguous {
        count: usize,
        matches: Vec<SearchMatch>,
    },
}

impl SearchOutcome {
    /// Feature ids of every match.
    #[must_use]
    pub fn hits(&self) -> Vec<FeatureId> {
        match self {
            Self::NotFound { .. } => Vec::new(),
            Self::Unique { feature, .. } => vec![*feature],
            Self::Ambiguous { matches, .. } => matches.iter().map(|m| m.feature).collect(),
        }
    }
}

fn contains_folded(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

/// Search villages for `query`.
///
/// Returns `None` when the query is empty after trimming.
#[must_use]
pub fn search_villages(
    query: &str,
    catalog: &FeatureCatalog,
    table: &NameKeyTable,
) -> Option<SearchOutcome> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();

    let mut matches: Vec<SearchMatch> = catalog
        .villages
        .iter()
        .filter(|(_, f)| {
            contains_folded(display_name(f, table, HierarchyLevel::Village), &needle)
                || contains_folded(f.text(&table.village_clean), &needle)
        })
        .map(|(id, f)| SearchMatch {
            feature: id,
            label: clean_name(f, table).unwrap_or_default().to_string(),
            path: SelectionPath::of_village(f, table),
        })
        .collect();

    Some(match matches.len() {
        0 => SearchOutcome::NotFound {
            query: query.to_string(),
        },
        1 => {
            let only = matches.remove(0);
            SearchOutcome::Unique {
                feature: only.feature,
                path: only.path,
            }
        }
        count => SearchOutcome::Ambiguous {
            count,
            matches,
        },
    })
}
