//! Feature catalog
//!
//! The catalog is the read-only data side of a session: one
//! [`FeatureCollection`] per [`HierarchyLevel`]. It is built once by the
//! [`loader`] (or from the embedded [`fallback`] dataset) and replaced wholesale
//! on reload, never edited in place.

pub mod fallback;
pub mod loader;

use serde::Serialize;

use crate::core::HierarchyLevel;
use crate::geojson::{Feature, FeatureCollection, FeatureId};

pub use loader::{
    ConfiguredSource, DataFiles, DataSource, DirectorySource, HttpSource, LoadFailure, LoadReport,
    load_catalog,
};

/// The three per-level collections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCatalog {
    /// District boundaries
    pub districts: FeatureCollection,
    /// Sub-unit boundaries
    pub subunits: FeatureCollection,
    /// Village boundaries
    pub villages: FeatureCollection,
}

/// Feature counts per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogTotals {
    pub districts: usize,
    pub subunits: usize,
    pub villages: usize,
}

impl FeatureCatalog {
    #[must_use]
    pub fn new(
        districts: FeatureCollection,
        subunits: FeatureCollection,
        villages: FeatureCollection,
    ) -> Self {
        Self {
            districts,
            subunits,
            villages,
        }
    }

    /// Collection of a level.
    #[must_use]
    pub const fn collection(&self, level: HierarchyLevel) -> &FeatureCollection {
        match level {
            HierarchyLevel::District => &self.districts,
            HierarchyLevel::SubUnit => &self.subunits,
            HierarchyLevel::Village => &self.villages,
        }
    }

    /// Feature of a level by identity.
    #[must_use]
    pub fn feature(&self, level: HierarchyLevel, id: FeatureId) -> Option<&Feature> {
        self.collection(level).get(id)
    }

    #[must_use]
    pub fn totals(&self) -> CatalogTotals {
        CatalogTotals {
            districts: self.districts.len(),
            subunits: self.subunits.len(),
            villages: self.villages.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::Properties;
    use serde_json::Value;

    #[test]
    fn test_collection_by_level() {
        let one = FeatureCollection::new(vec![Feature::new(Properties::new(), Value::Null)]);
        let catalog =
            FeatureCatalog::new(FeatureCollection::default(), one, FeatureCollection::default());

        assert!(catalog.collection(HierarchyLevel::District).is_empty());
        assert_eq!(catalog.collection(HierarchyLevel::SubUnit).len(), 1);
        assert!(catalog.feature(HierarchyLevel::SubUnit, FeatureId(0)).is_some());
        assert!(catalog.feature(HierarchyLevel::SubUnit, FeatureId(1)).is_none());
        assert_eq!(
            catalog.totals(),
            CatalogTotals {
                districts: 0,
                subunits: 1,
                villages: 0
            }
        );
    }
}
