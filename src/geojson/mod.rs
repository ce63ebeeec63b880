//! GeoJSON feature model
//!
//! admap only needs a thin slice of GeoJSON: a `FeatureCollection` tag, a
//! list of features, and per feature a property mapping plus an opaque
//! geometry. Geometry is kept as raw JSON so files round-trip untouched; it
//! is only read through `geojson`/`geo` to compute lon/lat bounding boxes
//! for "zoom to selection".
//!
//! Property order is preserved (serde_json `preserve_order`), because the
//! property-key heuristic in [`crate::properties`] falls back to the *first*
//! string-valued property.
//!
//! # Examples
//!
//! ```rust
//! use admap_cli::geojson::FeatureCollection;
//!
//! let text = r#"{
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "properties": { "district": "North" },
//!         "geometry": { "type": "Point", "coordinates": [88.5, 22.1] }
//!     }]
//! }"#;
//!
//! let collection = FeatureCollection::from_json_str(text, "inline").unwrap();
//! assert_eq!(collection.len(), 1);
//! assert_eq!(collection.features[0].text("district"), Some("North"));
//! ```

use anyhow::Result;
use geo::{BoundingRect, Rect};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::AdmapError;

/// Ordered property mapping of a feature.
pub type Properties = serde_json::Map<String, Value>;

/// Identity of a feature: its position in the (immutable) collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub usize);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// One geographic record: a geometry plus named attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    kind: FeatureTag,

    /// Optional feature identifier carried by some exporters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Attribute mapping; `null` in the source document becomes empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,

    /// Raw geometry, opaque to the engine
    #[serde(default)]
    pub geometry: Value,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Properties>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Feature {
    /// Build a feature from properties and a geometry.
    #[must_use]
    pub fn new(properties: Properties, geometry: Value) -> Self {
        Self {
            kind: FeatureTag::Feature,
            id: None,
            properties,
            geometry,
        }
    }

    /// Non-empty string value of a property.
    ///
    /// Numbers, booleans, `null` and empty strings yield `None`; names in the
    /// source data are always strings.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric value of a property.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// Lon/lat bounding box of the geometry, if it has any positions.
    ///
    /// Geometry that is missing or not valid GeoJSON has no bounds.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let geometry = match ::geojson::Geometry::deserialize(&self.geometry) {
            Ok(geometry) => geometry,
            Err(e) => {
                if !self.geometry.is_null() {
                    debug!("Ignoring unreadable geometry: {e}");
                }
                return None;
            }
        };
        let geometry = geo::Geometry::<f64>::try_from(geometry).ok()?;
        geometry.bounding_rect().map(Bounds::from)
    }
}

/// Axis-aligned lon/lat rectangle in the dataset's own coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Westernmost longitude
    pub min_lon: f64,
    /// Southernmost latitude
    pub min_lat: f64,
    /// Easternmost longitude
    pub max_lon: f64,
    /// Northernmost latitude
    pub max_lat: f64,
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        }
    }
}

impl Bounds {
    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(self, other: Bounds) -> Self {
        Self {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Centre of the rectangle as `(lon, lat)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        ((self.min_lon + self.max_lon) / 2.0, (self.min_lat + self.max_lat) / 2.0)
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}] - [{:.4}, {:.4}]",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Ordered features of one hierarchy level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: CollectionTag,

    /// Features in document order
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Build a collection from features.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionTag::FeatureCollection,
            features,
        }
    }

    /// Parse a GeoJSON document.
    ///
    /// `location` only appears in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`AdmapError::InvalidFeatureCollection`] when the text is not
    /// JSON, or is JSON without `"type": "FeatureCollection"`.
    pub fn from_json_str(text: &str, location: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            AdmapError::InvalidFeatureCollection {
                location: location.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Serialize as pretty-printed GeoJSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature by identity.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id.0)
    }

    /// Features paired with their identities, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &Feature)> {
        self.features.iter().enumerate().map(|(i, f)| (FeatureId(i), f))
    }

    /// Properties of the first feature, used as the sample for key resolution.
    #[must_use]
    pub fn sample_properties(&self) -> Option<&Properties> {
        self.features.first().map(|f| &f.properties)
    }

    /// Bounding box over every feature with a geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.features.iter().filter_map(Feature::bounds).reduce(Bounds::union)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Bounds {
        Bounds {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
        })
    }

    #[test]
    fn test_parse_collection_with_null_properties() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": null, "geometry": null },
                { "type": "Feature", "properties": { "name": "A" }, "geometry": null }
            ]
        }"#;

        let collection = FeatureCollection::from_json_str(text, "test").unwrap();
        assert_eq!(collection.len(), 2);
        assert!(collection.features[0].properties.is_empty());
        assert_eq!(collection.features[1].text("name"), Some("A"));
    }

    #[test]
    fn test_rejects_wrong_type_tag() {
        let text = r#"{ "type": "Feature", "features": [] }"#;
        let err = FeatureCollection::from_json_str(text, "bad.geojson").unwrap_err();
        let admap = err.downcast_ref::<AdmapError>().unwrap();
        assert!(matches!(admap, AdmapError::InvalidFeatureCollection { .. }));
        assert!(err.to_string().contains("bad.geojson"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(FeatureCollection::from_json_str("{ not json", "x").is_err());
    }

    #[test]
    fn test_property_order_preserved() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{ "type": "Feature",
                "properties": { "zeta": "1", "alpha": "2", "mid": "3" },
                "geometry": null }]
        }"#;
        let collection = FeatureCollection::from_json_str(text, "test").unwrap();
        let keys: Vec<&str> =
            collection.sample_properties().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_text_ignores_empty_and_non_strings() {
        let mut props = Properties::new();
        props.insert("empty".into(), json!(""));
        props.insert("null".into(), Value::Null);
        props.insert("code".into(), json!(42));
        props.insert("name".into(), json!("Gosaba"));
        let feature = Feature::new(props, Value::Null);

        assert_eq!(feature.text("empty"), None);
        assert_eq!(feature.text("null"), None);
        assert_eq!(feature.text("code"), None);
        assert_eq!(feature.text("missing"), None);
        assert_eq!(feature.text("name"), Some("Gosaba"));
        assert_eq!(feature.number("code"), Some(42.0));
    }

    #[test]
    fn test_bounds_polygon_and_collection() {
        let a = Feature::new(Properties::new(), square(88.5, 21.5, 88.75, 21.75));
        let b = Feature::new(Properties::new(), square(89.0, 21.0, 89.25, 21.6));
        let none = Feature::new(Properties::new(), Value::Null);

        let bounds = a.bounds().unwrap();
        assert_eq!(bounds, rect(88.5, 21.5, 88.75, 21.75));
        assert!(none.bounds().is_none());

        let collection = FeatureCollection::new(vec![a, none, b]);
        let all = collection.bounds().unwrap();
        assert_eq!(all.min_lon, 88.5);
        assert_eq!(all.min_lat, 21.0);
        assert_eq!(all.max_lon, 89.25);
        assert_eq!(all.max_lat, 21.75);
    }

    #[test]
    fn test_bounds_geometry_collection_and_multipolygon() {
        let geometry = json!({
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Point", "coordinates": [1.0, 2.0] },
                {
                    "type": "MultiPolygon",
                    "coordinates": [[[[3.0, -1.0], [4.0, 5.0], [3.0, -1.0]]]]
                }
            ]
        });
        let feature = Feature::new(Properties::new(), geometry);
        let bounds = feature.bounds().unwrap();
        assert_eq!(bounds, rect(1.0, -1.0, 4.0, 5.0));
        assert_eq!(bounds.center(), (2.5, 2.0));
    }

    #[test]
    fn test_bounds_ignores_invalid_geometry() {
        let broken = json!({ "type": "Polygon", "coordinates": "nope" });
        let unknown = json!({ "type": "Circle", "radius": 3 });
        let empty = json!({ "type": "MultiPoint", "coordinates": [] });

        for geometry in [broken, unknown, empty] {
            assert!(Feature::new(Properties::new(), geometry).bounds().is_none());
        }

        let line = json!({ "type": "LineString", "coordinates": [[-2.0, 3.0], [1.5, -4.0]] });
        let bounds = Feature::new(Properties::new(), line).bounds().unwrap();
        assert_eq!(bounds, rect(-2.0, -4.0, 1.5, 3.0));
    }

    #[test]
    fn test_serialize_writes_type_tags() {
        let collection = FeatureCollection::new(vec![Feature::new(Properties::new(), Value::Null)]);
        let value: Value = serde_json::from_str(&collection.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
    }
}
