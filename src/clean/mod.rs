//! Village name cleaning and dataset enrichment
//!
//! Raw village exports carry names in every casing with stray whitespace and
//! census abbreviations ("KUMIRMARI  CT", "Rampur Pt I"). This module derives
//! the `village_clean` label shown in choice lists and adds the reference
//! columns the navigator reads parent names from:
//!
//! | Source column | Added column      |
//! |---------------|-------------------|
//! | `village`     | `village_clean`   |
//! | `vlcode`      | `village_code`    |
//! | `block`       | `block_name`      |
//! | `subdistric`  | `subdistric_name` |
//! | `district`    | `district_name`   |
//!
//! Missing source columns produce empty strings. Features are then sorted by
//! district, sub-unit and clean label.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::constants::{
    AREA_KEY, CLEAN_NAME_KEY, DISTRICT_FALLBACK_KEY, SUBUNIT_FALLBACK_KEY, UNKNOWN_VILLAGE,
};
use crate::geojson::{Feature, FeatureCollection};

/// Abbreviation fixes, applied in order after title-casing.
const REPLACEMENTS: &[(&str, &str)] = &[
    (" Ct", " (Census Town)"),
    ("Ct ", "(Census Town) "),
    (" Pt ", " Part "),
    (" Pt.", " Part"),
    (" No ", " No. "),
    ("Gram Panchayat", "GP"),
    (" Gp", " GP"),
];

/// Source column → added column.
const COPIED_COLUMNS: &[(&str, &str)] = &[
    ("vlcode", "village_code"),
    ("block", "block_name"),
    ("subdistric", SUBUNIT_FALLBACK_KEY),
    ("district", DISTRICT_FALLBACK_KEY),
];

fn collapse_whitespace(s: &str) -> String {
    static WHITESPACE: OnceLock<Option<Regex>> = OnceLock::new();
    WHITESPACE
        .get_or_init(|| Regex::new(r"\s+").ok())
        .as_ref()
        .map_or_else(|| s.to_string(), |re| re.replace_all(s, " ").into_owned())
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

/// Normalize a raw village name for display.
///
/// # Examples
///
/// ```rust
/// use admap_cli::clean::clean_village_name;
///
/// assert_eq!(clean_village_name(Some("  KUMIRMARI   CT ")), "Kumirmari (Census Town)");
/// assert_eq!(clean_village_name(Some("rampur pt i")), "Rampur Part I");
/// assert_eq!(clean_village_name(None), "Unknown Village");
/// ```
#[must_use]
pub fn clean_village_name(name: Option<&str>) -> String {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return UNKNOWN_VILLAGE.to_string();
    };

    let collapsed = collapse_whitespace(name);
    let mut cleaned = title_case(&collapsed);
    for (from, to) in REPLACEMENTS {
        cleaned = cleaned.replace(from, to);
    }
    cleaned
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn sort_key(feature: &Feature) -> (String, String, String) {
    let get = |key: &str| feature.text(key).unwrap_or("").to_string();
    (get(DISTRICT_FALLBACK_KEY), get(SUBUNIT_FALLBACK_KEY), get(CLEAN_NAME_KEY))
}

/// Add clean labels and reference columns to a raw village collection.
#[must_use]
pub fn enrich_villages(collection: &FeatureCollection) -> FeatureCollection {
    let mut features: Vec<Feature> = collection
        .features
        .iter()
        .map(|feature| {
            let mut feature = feature.clone();
            let raw = text_of(feature.properties.get("village"));
            feature.properties.insert(
                CLEAN_NAME_KEY.to_string(),
                Value::String(clean_village_name(raw.as_deref())),
            );
            for (from, to) in COPIED_COLUMNS {
                let copied = text_of(feature.properties.get(*from)).unwrap_or_default();
                feature.properties.insert((*to).to_string(), Value::String(copied));
            }
            feature
        })
        .collect();

    features.sort_by_cached_key(sort_key);
    FeatureCollection::new(features)
}

/// Village count of one district in an enriched collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictCount {
    pub district: String,
    pub villages: usize,
}

/// Statistics over an enriched village collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichReport {
    pub villages: usize,
    /// Districts by descending village count
    pub per_district: Vec<DistrictCount>,
    /// Sum of numeric `area_km2` values
    pub total_area_km2: f64,
}

impl EnrichReport {
    #[must_use]
    pub fn of(collection: &FeatureCollection) -> Self {
        let mut per_district: Vec<DistrictCount> = Vec::new();
        for feature in &collection.features {
            let district = sort_key(feature).0;
            match per_district.iter_mut().find(|c| c.district == district) {
                Some(count) => count.villages += 1,
                None => per_district.push(DistrictCount {
                    district,
                    villages: 1,
                }),
            }
        }
        per_district.sort_by(|a, b| b.villages.cmp(&a.villages));

        Self {
            villages: collection.len(),
            per_district,
            total_area_km2: collection.features.iter().filter_map(|f| f.number(AREA_KEY)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::Properties;
    use serde_json::json;

    fn village(props: Value) -> Feature {
        let properties: Properties = props.as_object().cloned().unwrap();
        Feature::new(properties, Value::Null)
    }

    fn located(name: &str, subunit: &str, district: &str, area: Option<f64>) -> Feature {
        let mut props = json!({ "village": name, "subdistric": subunit, "district": district });
        if let Some(area) = area {
            props["area_km2"] = json!(area);
        }
        village(props)
    }

    #[test]
    fn test_blank_names_become_unknown() {
        assert_eq!(clean_village_name(None), "Unknown Village");
        assert_eq!(clean_village_name(Some("")), "Unknown Village");
        assert_eq!(clean_village_name(Some("   ")), "Unknown Village");
    }

    #[test]
    fn test_whitespace_and_case() {
        assert_eq!(clean_village_name(Some("  uttar\t\tKUMIRMARI ")), "Uttar Kumirmari");
        assert_eq!(clean_village_name(Some("o'neil")), "O'Neil");
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(clean_village_name(Some("basanti ct")), "Basanti (Census Town)");
        assert_eq!(clean_village_name(Some("ct road")), "(Census Town) Road");
        assert_eq!(clean_village_name(Some("gosaba pt ii")), "Gosaba Part Ii");
        assert_eq!(clean_village_name(Some("gosaba pt.")), "Gosaba Part");
        assert_eq!(clean_village_name(Some("plot no 5")), "Plot No. 5");
        assert_eq!(clean_village_name(Some("satjelia gram panchayat")), "Satjelia GP");
        assert_eq!(clean_village_name(Some("satjelia gp")), "Satjelia GP");
    }

    #[test]
    fn test_enrich_adds_columns_and_keeps_others() {
        let collection = FeatureCollection::new(vec![village(json!({
            "village": "SATJELIA",
            "vlcode": 31205,
            "block": "Gosaba",
            "subdistric": "Basanti",
            "district": "24 Paraganas South",
            "extra": true
        }))]);

        let enriched = enrich_villages(&collection);
        let feature = &enriched.features[0];
        assert_eq!(feature.text("village_clean"), Some("Satjelia"));
        assert_eq!(feature.text("village_code"), Some("31205"));
        assert_eq!(feature.text("block_name"), Some("Gosaba"));
        assert_eq!(feature.text("subdistric_name"), Some("Basanti"));
        assert_eq!(feature.text("district_name"), Some("24 Paraganas South"));
        assert_eq!(feature.properties.get("extra"), Some(&json!(true)));
    }

    #[test]
    fn test_enrich_missing_columns_are_empty() {
        let collection = FeatureCollection::new(vec![village(json!({ "name": "x" }))]);
        let enriched = enrich_villages(&collection);
        let props = &enriched.features[0].properties;
        assert_eq!(props.get("village_clean"), Some(&json!("Unknown Village")));
        assert_eq!(props.get("block_name"), Some(&json!("")));
        assert_eq!(props.get("district_name"), Some(&json!("")));
    }

    #[test]
    fn test_enrich_sorts_by_hierarchy() {
        let collection = FeatureCollection::new(vec![
            located("b", "S2", "D1", Some(1.0)),
            located("c", "S1", "D2", Some(2.0)),
            located("a", "S2", "D1", Some(0.5)),
            located("z", "S1", "D1", None),
        ]);

        let enriched = enrich_villages(&collection);
        let order: Vec<&str> =
            enriched.features.iter().filter_map(|f| f.text("village_clean")).collect();
        assert_eq!(order, vec!["Z", "A", "B", "C"]);

        let report = EnrichReport::of(&enriched);
        assert_eq!(report.villages, 4);
        let expected = DistrictCount {
            district: "D1".into(),
            villages: 3,
        };
        assert_eq!(report.per_district[0], expected);
        assert!((report.total_area_km2 - 3.5).abs() < f64::EPSILON);
    }
}
