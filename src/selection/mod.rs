//! Selection state machine
//!
//! The selection is the user's current path through the hierarchy:
//! an optional district, an optional sub-unit within it, and an optional
//! village within that. A child choice never outlives its parent:
//!
//! - choosing a district clears the sub-unit and village
//! - choosing a sub-unit clears the village
//! - choosing a village clears nothing
//!
//! Choices below an empty parent are ignored rather than stored, so a
//! [`SelectionState`] with a sub-unit but no district cannot exist. Names are
//! not validated here; checking them against the option lists is the caller's
//! job.
//!
//! # Examples
//!
//! ```rust
//! use admap_cli::selection::{Depth, SelectionMachine};
//!
//! let mut machine = SelectionMachine::new();
//! assert!(!machine.select_subunit(Some("Basanti")));
//!
//! machine.select_district(Some("Gosaba Block"));
//! machine.select_subunit(Some("Basanti"));
//! machine.select_village(Some("Satjelia"));
//! assert_eq!(machine.state().depth(), Depth::Full);
//!
//! machine.select_district(Some("Other"));
//! assert_eq!(machine.state().subunit(), None);
//! ```

use serde::Serialize;

use crate::core::HierarchyLevel;

/// How far down the hierarchy a selection reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Depth {
    Empty,
    DistrictOnly,
    DistrictAndSubUnit,
    Full,
}

/// Current district, sub-unit and village names.
///
/// Only [`SelectionMachine`] builds non-empty states, which keeps the
/// parent-before-child invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    district: Option<String>,
    subunit: Option<String>,
    village: Option<String>,
}

impl SelectionState {
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    #[must_use]
    pub fn subunit(&self) -> Option<&str> {
        self.subunit.as_deref()
    }

    #[must_use]
    pub fn village(&self) -> Option<&str> {
        self.village.as_deref()
    }

    /// Selected name at a level.
    #[must_use]
    pub fn get(&self, level: HierarchyLevel) -> Option<&str> {
        match level {
            HierarchyLevel::District => self.district(),
            HierarchyLevel::SubUnit => self.subunit(),
            HierarchyLevel::Village => self.village(),
        }
    }

    #[must_use]
    pub const fn depth(&self) -> Depth {
        match (&self.district, &self.subunit, &self.village) {
            (None, _, _) => Depth::Empty,
            (Some(_), None, _) => Depth::DistrictOnly,
            (Some(_), Some(_), None) => Depth::DistrictAndSubUnit,
            (Some(_), Some(_), Some(_)) => Depth::Full,
        }
    }

    /// Deepest level with a selection.
    #[must_use]
    pub const fn deepest(&self) -> Option<HierarchyLevel> {
        match self.depth() {
            Depth::Empty => None,
            Depth::DistrictOnly => Some(HierarchyLevel::District),
            Depth::DistrictAndSubUnit => Some(HierarchyLevel::SubUnit),
            Depth::Full => Some(HierarchyLevel::Village),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.district.is_none()
    }

    /// Whether the parent-before-child invariant holds.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        (self.subunit.is_none() || self.district.is_some())
            && (self.village.is_none() || (self.subunit.is_some() && self.district.is_some()))
    }
}

/// Owner of the selection; the only way to change it.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
}

impl SelectionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Set the district and clear everything below it.
    ///
    /// Always applied; returns `true`.
    pub fn select_district(&mut self, name: Option<&str>) -> bool {
        self.state.district = name.map(str::to_string);
        self.state.subunit = None;
        self.state.village = None;
        true
    }

    /// Set the sub-unit and clear the village.
    ///
    /// Ignored, returning `false`, while no district is selected.
    pub fn select_subunit(&mut self, name: Option<&str>) -> bool {
        if self.state.district.is_none() {
            return false;
        }
        self.state.subunit = name.map(str::to_string);
        self.state.village = None;
        true
    }

    /// Set the village.
    ///
    /// Ignored, returning `false`, while no sub-unit is selected.
    pub fn select_village(&mut self, name: Option<&str>) -> bool {
        if self.state.subunit.is_none() {
            return false;
        }
        self.state.village = name.map(str::to_string);
        true
    }

    /// Dispatch to the transition for `level`.
    pub fn select(&mut self, level: HierarchyLevel, name: Option<&str>) -> bool {
        match level {
            HierarchyLevel::District => self.select_district(name),
            HierarchyLevel::SubUnit => self.select_subunit(name),
            HierarchyLevel::Village => self.select_village(name),
        }
    }

    /// Back to the empty selection.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }
}
