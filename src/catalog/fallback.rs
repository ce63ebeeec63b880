//! Embedded fallback dataset.
//!
//! Used whenever any of the three real documents cannot be loaded. The
//! documents have the same shape as exported data so the property resolver
//! treats them like any other input.

use anyhow::Result;

use super::FeatureCatalog;
use crate::core::AdmapError;
use crate::geojson::FeatureCollection;

const DISTRICTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "district": "24 Paraganas South" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[88.5, 21.5], [89.5, 21.5], [89.5, 22.5], [88.5, 22.5], [88.5, 21.5]]]
      }
    }
  ]
}"#;

const SUBUNITS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "subdistric": "Basanti", "district": "24 Paraganas South" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[88.5, 21.5], [89.0, 21.5], [89.0, 22.0], [88.5, 22.0], [88.5, 21.5]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "subdistric": "Gosaba", "district": "24 Paraganas South" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[89.0, 21.5], [89.5, 21.5], [89.5, 22.0], [89.0, 22.0], [89.0, 21.5]]]
      }
    }
  ]
}"#;

const VILLAGES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {
        "village": "Satjelia",
        "village_clean": "Satjelia",
        "subdistric_name": "Basanti",
        "district_name": "24 Paraganas South",
        "area_km2": 2.5
      },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[88.5, 21.5], [88.75, 21.5], [88.75, 21.75], [88.5, 21.75], [88.5, 21.5]]]
      }
    },
    {
      "type": "Feature",
      "properties": {
        "village": "Kumirmari",
        "village_clean": "Kumirmari",
        "subdistric_name": "Basanti",
        "district_name": "24 Paraganas South",
        "area_km2": 1.8
      },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[88.75, 21.5], [89.0, 21.5], [89.0, 21.75], [88.75, 21.75], [88.75, 21.5]]]
      }
    },
    {
      "type": "Feature",
      "properties": {
        "village": "Lahiripur",
        "village_clean": "Lahiripur",
        "subdistric_name": "Gosaba",
        "district_name": "24 Paraganas South",
        "area_km2": 3.2
      },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[89.0, 21.5], [89.25, 21.5], [89.25, 21.75], [89.0, 21.75], [89.0, 21.5]]]
      }
    }
  ]
}"#;

fn parse(text: &str, name: &str) -> Result<FeatureCollection> {
    FeatureCollection::from_json_str(text, name).map_err(|e| {
        AdmapError::FallbackUnavailable {
            reason: e.to_string(),
        }
        .into()
    })
}

/// Build the fallback catalog.
///
/// # Errors
///
/// Returns [`AdmapError::FallbackUnavailable`] if an embedded document does
/// not parse.
pub fn fallback_catalog() -> Result<FeatureCatalog> {
    Ok(FeatureCatalog::new(
        parse(DISTRICTS, "fallback districts")?,
        parse(SUBUNITS, "fallback sub-units")?,
        parse(VILLAGES, "fallback villages")?,
    ))
}
