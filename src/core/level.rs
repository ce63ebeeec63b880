//! Administrative hierarchy levels
//!
//! Every dataset admap works with describes one level of a three-tier
//! administrative hierarchy:
//! - **District**: the top-level unit
//! - **Sub-unit** (often labelled "SS" in source data): a child of a district
//! - **Village**: the leaf unit, a child of a sub-unit
//!
//! Levels are totally ordered, ancestor first, so `District < SubUnit < Village`.
//!
//! # Examples
//!
//! ```rust
//! use admap_cli::core::HierarchyLevel;
//!
//! let level: HierarchyLevel = "ss".parse().unwrap();
//! assert_eq!(level, HierarchyLevel::SubUnit);
//! assert_eq!(level.parent(), Some(HierarchyLevel::District));
//! assert!(HierarchyLevel::District < HierarchyLevel::Village);
//!
//! let json = serde_json::to_string(&HierarchyLevel::SubUnit).unwrap();
//! assert_eq!(json, "\"subunit\"");
//! ```

use serde::{Deserialize, Serialize};

/// One tier of the administrative hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyLevel {
    /// Top-level administrative unit
    District,

    /// Second-level unit, child of a district
    SubUnit,

    /// Leaf unit, child of a sub-unit
    Village,
}

impl HierarchyLevel {
    /// All levels, ancestor first.
    #[must_use]
    pub const fn all() -> &'static [HierarchyLevel] {
        &[HierarchyLevel::District, HierarchyLevel::SubUnit, HierarchyLevel::Village]
    }

    /// The level directly above this one, if any.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            HierarchyLevel::District => None,
            HierarchyLevel::SubUnit => Some(HierarchyLevel::District),
            HierarchyLevel::Village => Some(HierarchyLevel::SubUnit),
        }
    }

    /// The level directly below this one, if any.
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            HierarchyLevel::District => Some(HierarchyLevel::SubUnit),
            HierarchyLevel::SubUnit => Some(HierarchyLevel::Village),
            HierarchyLevel::Village => None,
        }
    }

    /// Position of the level in [`HierarchyLevel::all`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            HierarchyLevel::District => 0,
            HierarchyLevel::SubUnit => 1,
            HierarchyLevel::Village => 2,
        }
    }

    /// Human-facing heading used by renderers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            HierarchyLevel::District => "District",
            HierarchyLevel::SubUnit => "SS",
            HierarchyLevel::Village => "Village",
        }
    }
}

impl std::fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HierarchyLevel::District => write!(f, "district"),
            HierarchyLevel::SubUnit => write!(f, "subunit"),
            HierarchyLevel::Village => write!(f, "village"),
        }
    }
}

impl std::str::FromStr for HierarchyLevel {
    type Err = crate::core::AdmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "district" | "districts" => Ok(HierarchyLevel::District),
            "subunit" | "sub-unit" | "ss" | "subdistrict" => Ok(HierarchyLevel::SubUnit),
            "village" | "villages" => Ok(HierarchyLevel::Village),
            _ => Err(crate::core::AdmapError::InvalidLevel {
                level: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_level_ordering() {
        assert!(HierarchyLevel::District < HierarchyLevel::SubUnit);
        assert!(HierarchyLevel::SubUnit < HierarchyLevel::Village);

        let mut levels =
            vec![HierarchyLevel::Village, HierarchyLevel::District, HierarchyLevel::SubUnit];
        levels.sort();
        assert_eq!(levels, HierarchyLevel::all());
    }

    #[test]
    fn test_level_parent_child() {
        assert_eq!(HierarchyLevel::District.parent(), None);
        assert_eq!(HierarchyLevel::Village.parent(), Some(HierarchyLevel::SubUnit));
        assert_eq!(HierarchyLevel::District.child(), Some(HierarchyLevel::SubUnit));
        assert_eq!(HierarchyLevel::Village.child(), None);

        for level in HierarchyLevel::all() {
            assert_eq!(HierarchyLevel::all()[level.index()], *level);
        }
    }

    #[test]
    fn test_level_display_round_trip() {
        for level in HierarchyLevel::all() {
            assert_eq!(HierarchyLevel::from_str(&level.to_string()).unwrap(), *level);
        }
    }

    #[test]
    fn test_level_from_str_aliases() {
        assert_eq!(HierarchyLevel::from_str("SS").unwrap(), HierarchyLevel::SubUnit);
        assert_eq!(HierarchyLevel::from_str("sub-unit").unwrap(), HierarchyLevel::SubUnit);
        assert_eq!(HierarchyLevel::from_str(" Village ").unwrap(), HierarchyLevel::Village);

        let err = HierarchyLevel::from_str("block").unwrap_err();
        assert!(err.to_string().contains("block"));
    }
}
