//! Property resolver
//!
//! Source datasets are inconsistent about which attribute carries a unit's
//! name: one export writes `district`, another `DISTRICT` or `DIST_NAME`, a
//! cleaned village export adds `village_clean`, and child layers may carry the
//! parent's name under the parent layer's key or under `district_name` /
//! `subdistric_name`.
//!
//! This module turns that guesswork into an explicit contract:
//!
//! - [`resolve_name_key`] picks the display-name key of one level from a
//!   sample property mapping: the first candidate key that is present with a
//!   truthy value, otherwise the first string-valued property not already
//!   claimed by an ancestor level, otherwise a per-level default.
//! - [`NameKeyTable`] runs the resolver once per catalog load and records, for
//!   every level, a [`KeyChain`] for the display name and for each ancestor
//!   reference. A key chain is an ordered list of keys where the first
//!   non-empty string value wins, which is how documented fallback keys are
//!   consulted.
//! - [`display_name`], [`ancestor_name`] and [`clean_name`] are the typed
//!   accessors every other module uses instead of indexing into properties.
//!
//! # Examples
//!
//! ```rust
//! use admap_cli::core::HierarchyLevel;
//! use admap_cli::properties::resolve_name_key;
//! use serde_json::json;
//!
//! let sample = json!({ "OBJECTID": 4, "DIST_NAME": "North", "STATE": "WB" });
//! let key = resolve_name_key(HierarchyLevel::District, sample.as_object());
//! assert_eq!(key, "DIST_NAME");
//! ```

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::catalog::FeatureCatalog;
use crate::constants::{CLEAN_NAME_KEY, DISTRICT_FALLBACK_KEY, SUBUNIT_FALLBACK_KEY};
use crate::core::HierarchyLevel;
use crate::geojson::{Feature, Properties};

/// Candidate district name keys, most specific first.
pub const DISTRICT_CANDIDATES: &[&str] =
    &["district", "District", "DISTRICT", "district_name", "DIST_NAME", "NAME", "name"];

/// Candidate sub-unit name keys, most specific first.
pub const SUBUNIT_CANDIDATES: &[&str] = &[
    "subdistric",
    "SS_NAME",
    "SS",
    "ss",
    "SS_name",
    "subdistric_name",
    "SUB_DIST",
    "SUBDIST",
    "NAME",
    "name",
];

/// Candidate village name keys, most specific first.
///
/// The raw `village` column is preferred over `village_clean` so that option
/// values stay the original names and the clean label can be shown beside them.
pub const VILLAGE_CANDIDATES: &[&str] =
    &["village", "Village", "VILLAGE", "VILL_NAME", "village_clean", "NAME", "name"];

/// Ordered candidate keys for a level.
#[must_use]
pub const fn candidate_keys(level: HierarchyLevel) -> &'static [&'static str] {
    match level {
        HierarchyLevel::District => DISTRICT_CANDIDATES,
        HierarchyLevel::SubUnit => SUBUNIT_CANDIDATES,
        HierarchyLevel::Village => VILLAGE_CANDIDATES,
    }
}

/// Key assumed when nothing in the sample helps.
#[must_use]
pub const fn default_key(level: HierarchyLevel) -> &'static str {
    match level {
        HierarchyLevel::District => "DISTRICT",
        HierarchyLevel::SubUnit => "SS_NAME",
        HierarchyLevel::Village => "village",
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolve the display-name key of `level` from a sample property mapping.
///
/// Equivalent to [`resolve_name_key_excluding`] with nothing claimed.
#[must_use]
pub fn resolve_name_key(level: HierarchyLevel, sample: Option<&Properties>) -> String {
    resolve_name_key_excluding(level, sample, &[])
}

/// Resolve the display-name key of `level`, skipping `claimed` keys in the
/// string-property fallback.
///
/// `claimed` holds the keys already resolved for ancestor levels, so a
/// village layer that only carries `district`, `block` and `vname` resolves
/// to `block` rather than re-using the district key.
#[must_use]
pub fn resolve_name_key_excluding(
    level: HierarchyLevel,
    sample: Option<&Properties>,
    claimed: &[&str],
) -> String {
    let Some(props) = sample else {
        return default_key(level).to_string();
    };

    if let Some(key) =
        candidate_keys(level).iter().find(|key| props.get(**key).is_some_and(is_truthy))
    {
        return (*key).to_string();
    }

    props
        .iter()
        .find(|(key, value)| value.is_string() && !claimed.contains(&key.as_str()))
        .map_or_else(|| default_key(level).to_string(), |(key, _)| key.clone())
}

/// Ordered property keys; the first one holding a non-empty string wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyChain(Vec<String>);

impl KeyChain {
    /// Build a chain, dropping duplicate keys while keeping first positions.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chain: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !chain.contains(&key) {
                chain.push(key);
            }
        }
        Self(chain)
    }

    /// Same chain without `key`.
    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.0.retain(|k| k != key);
        self
    }

    /// The most preferred key.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Keys in preference order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// First non-empty string value among the chain's keys.
    #[must_use]
    pub fn lookup<'a>(&self, feature: &'a Feature) -> Option<&'a str> {
        self.0.iter().find_map(|key| feature.text(key))
    }
}

impl std::fmt::Display for KeyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(" | "))
    }
}

/// Resolved property keys for every hierarchy level.
///
/// Computed once per catalog load with [`NameKeyTable::resolve`]; immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameKeyTable {
    /// District display name on district features
    pub district: KeyChain,
    /// Sub-unit display name on sub-unit features (primary, then `subdistric_name`)
    pub subunit: KeyChain,
    /// Village display name on village features
    pub village: KeyChain,
    /// District reference on sub-unit features
    pub subunit_district_ref: KeyChain,
    /// District reference on village features
    pub village_district_ref: KeyChain,
    /// Sub-unit reference on village features
    pub village_subunit_ref: KeyChain,
    /// Normalized village label
    pub village_clean: String,
}

impl NameKeyTable {
    /// Resolve all keys from the first feature of each layer.
    #[must_use]
    pub fn resolve(catalog: &FeatureCatalog) -> Self {
        let district_key =
            resolve_name_key(HierarchyLevel::District, catalog.districts.sample_properties());
        let subunit_key = resolve_name_key_excluding(
            HierarchyLevel::SubUnit,
            catalog.subunits.sample_properties(),
            &[district_key.as_str()],
        );
        let village_key = resolve_name_key_excluding(
            HierarchyLevel::Village,
            catalog.villages.sample_properties(),
            &[district_key.as_str(), subunit_key.as_str()],
        );

        Self::from_keys(&district_key, &subunit_key, &village_key)
    }

    /// Build the table from already-known display-name keys.
    #[must_use]
    pub fn from_keys(district_key: &str, subunit_key: &str, village_key: &str) -> Self {
        let district_ref = KeyChain::new([district_key, DISTRICT_FALLBACK_KEY]);
        let subunit_ref = KeyChain::new([subunit_key, SUBUNIT_FALLBACK_KEY]);

        let table = Self {
            district: KeyChain::new([district_key]),
            subunit: KeyChain::new([subunit_key, SUBUNIT_FALLBACK_KEY]),
            village: KeyChain::new([village_key]),
            // A reference key equal to the layer's own name key would read the
            // feature's own name back as its parent.
            subunit_district_ref: district_ref.clone().without(subunit_key),
            village_district_ref: district_ref.without(village_key),
            village_subunit_ref: subunit_ref.without(village_key),
            village_clean: CLEAN_NAME_KEY.to_string(),
        };

        debug!(
            district = %table.district,
            subunit = %table.subunit,
            village = %table.village,
            "Resolved name keys"
        );

        table
    }

    /// Display-name chain for a level.
    #[must_use]
    pub const fn name_chain(&self, level: HierarchyLevel) -> &KeyChain {
        match level {
            HierarchyLevel::District => &self.district,
            HierarchyLevel::SubUnit => &self.subunit,
            HierarchyLevel::Village => &self.village,
        }
    }

    /// Chain holding `ancestor`'s name on features of `level`.
    ///
    /// `None` when `ancestor` is not above `level`.
    #[must_use]
    pub const fn ancestor_chain(
        &self,
        level: HierarchyLevel,
        ancestor: HierarchyLevel,
    ) -> Option<&KeyChain> {
        match (level, ancestor) {
            (HierarchyLevel::SubUnit, HierarchyLevel::District) => Some(&self.subunit_district_ref),
            (HierarchyLevel::Village, HierarchyLevel::District) => Some(&self.village_district_ref),
            (HierarchyLevel::Village, HierarchyLevel::SubUnit) => Some(&self.village_subunit_ref),
            _ => None,
        }
    }
}

/// Display name of a feature at `level`.
#[must_use]
pub fn display_name<'a>(
    feature: &'a Feature,
    table: &NameKeyTable,
    level: HierarchyLevel,
) -> Option<&'a str> {
    table.name_chain(level).lookup(feature)
}

/// Name of `ancestor` as recorded on a feature of `level`.
#[must_use]
pub fn ancestor_name<'a>(
    feature: &'a Feature,
    table: &NameKeyTable,
    level: HierarchyLevel,
    ancestor: HierarchyLevel,
) -> Option<&'a str> {
    table.ancestor_chain(level, ancestor).and_then(|chain| chain.lookup(feature))
}

/// Clean label of a village: `village_clean` when present, else the display name.
#[must_use]
pub fn clean_name<'a>(feature: &'a Feature, table: &NameKeyTable) -> Option<&'a str> {
    feature
        .text(&table.village_clean)
        .or_else(|| display_name(feature, table, HierarchyLevel::Village))
}
