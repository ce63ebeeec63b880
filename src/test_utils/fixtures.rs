//! Test fixtures for building sample catalogs
//!
//! [`CatalogBuilder`] writes properties the way exported data does: districts
//! under `district`, sub-units under `subdistric` with a `district` reference,
//! villages under `village` / `village_clean` with `subdistric_name` and
//! `district_name` references. Each feature gets a small square polygon so
//! bounds computations have something to work with.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

use crate::catalog::{DataFiles, FeatureCatalog};
use crate::geojson::{Feature, FeatureCollection, Properties};

fn square(index: usize) -> Value {
    let (x0, y0) = (88.0 + 0.25 * index as f64, 21.5);
    let (x1, y1) = (x0 + 0.25, y0 + 0.25);
    json!({
        "type": "Polygon",
        "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
    })
}

fn feature(value: Value, index: usize) -> Feature {
    let properties: Properties = match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    };
    Feature::new(properties, square(index))
}

/// Builder for small in-memory catalogs
#[derive(Debug, Default, Clone)]
pub struct CatalogBuilder {
    districts: Vec<Feature>,
    subunits: Vec<Feature>,
    villages: Vec<Feature>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn district(mut self, name: &str) -> Self {
        let index = self.districts.len();
        self.districts.push(feature(json!({ "district": name }), index));
        self
    }

    pub fn subunit(mut self, name: &str, district: &str) -> Self {
        let index = self.subunits.len();
        self.subunits.push(feature(json!({ "subdistric": name, "district": district }), index));
        self
    }

    /// Village whose clean label equals its name
    pub fn village(self, name: &str, subunit: &str, district: &str, area_km2: f64) -> Self {
        self.village_with_clean(name, name, subunit, district, area_km2)
    }

    pub fn village_with_clean(
        mut self,
        name: &str,
        clean: &str,
        subunit: &str,
        district: &str,
        area_km2: f64,
    ) -> Self {
        let index = self.villages.len();
        self.villages.push(feature(
            json!({
                "village": name,
                "village_clean": clean,
                "subdistric_name": subunit,
                "district_name": district,
                "area_km2": area_km2
            }),
            index,
        ));
        self
    }

    pub fn build(self) -> FeatureCatalog {
        FeatureCatalog::new(
            FeatureCollection::new(self.districts),
            FeatureCollection::new(self.subunits),
            FeatureCollection::new(self.villages),
        )
    }
}

/// The "Gosaba Block / Basanti" scenario: one district, one sub-unit, two villages
pub fn scenario_catalog() -> FeatureCatalog {
    CatalogBuilder::new()
        .district("Gosaba Block")
        .subunit("Basanti", "Gosaba Block")
        .village("Satjelia", "Basanti", "Gosaba Block", 2.5)
        .village("Kumirmari", "Basanti", "Gosaba Block", 1.8)
        .build()
}

/// Write a catalog as the three layer documents under `dir`
pub fn write_catalog_files(dir: &Path, catalog: &FeatureCatalog) -> Result<()> {
    let files = DataFiles::default();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for (file, collection) in [
        (&files.district, &catalog.districts),
        (&files.subunit, &catalog.subunits),
        (&files.village, &catalog.villages),
    ] {
        let path = dir.join(file);
        fs::write(&path, collection.to_json_pretty()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
