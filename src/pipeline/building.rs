//! Grouping of access points into buildings.
//!
//! Access points follow the `AP-<BUILDING>-<n>` naming convention. Names that
//! do not follow it are kept under their literal name rather than dropped; the
//! [`Building`] variant records which of the two happened so the allow-list can
//! refuse to match a literal name that merely looks like a building code.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::Movement;

// ---

/// Buildings whose flows are shown unless configured otherwise.
pub const DEFAULT_BUILDINGS: [&str; 11] = [
    "CIEN", "VET", "ETSE", "LLET", "POL", "ECON", "MED", "CEDU", "CCOM", "FTI", "DRET",
];

/// Building an access point belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Building {
    /// Code taken from an `AP-<CODE>` access point name.
    Code(String),
    /// Access point name that does not follow the convention, kept verbatim.
    Fallback(String),
}

impl Building {
    // ---
    pub fn name(&self) -> &str {
        match self {
            Self::Code(name) | Self::Fallback(name) => name,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Building {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

fn building_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^AP-([A-Z]+)").unwrap_or_else(|e| unreachable!("static regex is valid: {e}"))
    })
}

/// Map an access point name to its building.
pub fn building_for(access_point: &str) -> Building {
    // ---
    match building_pattern().captures(access_point).and_then(|c| c.get(1)) {
        Some(code) => Building::Code(code.as_str().to_string()),
        None => Building::Fallback(access_point.to_string()),
    }
}

/// Set of building codes whose movements are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    codes: BTreeSet<String>,
    /// Let literal access point names match a listed code.
    match_fallback: bool,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_BUILDINGS.iter().map(|c| c.to_string()), false)
    }
}

impl AllowList {
    // ---
    pub fn new(codes: impl IntoIterator<Item = String>, match_fallback: bool) -> Self {
        Self {
            codes: codes.into_iter().collect(),
            match_fallback,
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn admits(&self, building: &Building) -> bool {
        // ---
        if building.is_fallback() && !self.match_fallback {
            return false;
        }
        self.codes.contains(building.name())
    }
}

/// A movement annotated with the buildings at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingMovement {
    // ---
    #[serde(flatten)]
    pub movement: Movement,
    pub origin_building: Building,
    pub destination_building: Building,
}

/// Attach origin and destination buildings to every movement.
pub fn group_movements(movements: &[Movement]) -> Vec<BuildingMovement> {
    // ---
    movements
        .iter()
        .map(|m| BuildingMovement {
            movement: m.clone(),
            origin_building: building_for(&m.origin_access_point),
            destination_building: building_for(&m.destination_access_point),
        })
        .collect()
}

/// Keep cross-building movements whose both ends are on the allow-list.
pub fn filter_cross_building(grouped: &[BuildingMovement], allow: &AllowList) -> Vec<BuildingMovement> {
    // ---
    grouped
        .iter()
        .filter(|m| {
            allow.admits(&m.origin_building)
                && allow.admits(&m.destination_building)
                && m.origin_building.name() != m.destination_building.name()
        })
        .cloned()
        .collect()
}
