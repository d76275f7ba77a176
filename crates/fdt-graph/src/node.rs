//! Graph node types and the per-node feature encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use fdt_core::{GeoPoint, NodeIdx};

use crate::GraphError;

/// Number of features produced per node by [`Node::features`].
pub const FEATURE_WIDTH: usize = 8;

/// Column names of the feature vector, in order.
pub const FEATURE_NAMES: [&str; FEATURE_WIDTH] = [
    "elevation",
    "is_flood_zone",
    "is_hospital",
    "is_shelter",
    "is_power",
    "is_school",
    "current_depth",
    "population",
];

/// Depth (m) that maps to a normalised depth feature of 1.0.
const DEPTH_SCALE_M: f64 = 3.0;
/// Elevation (m) that maps to a normalised elevation feature of 1.0.
const ELEVATION_SCALE_M: f64 = 100.0;
/// Population that saturates the population feature.
const POPULATION_SCALE: f64 = 10_000.0;

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// What a facility node is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilitySubtype {
    Hospital,
    Shelter,
    PowerStation,
    School,
}

impl FacilitySubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            FacilitySubtype::Hospital     => "hospital",
            FacilitySubtype::Shelter      => "shelter",
            FacilitySubtype::PowerStation => "power_station",
            FacilitySubtype::School       => "school",
        }
    }
}

impl fmt::Display for FacilitySubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilitySubtype {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hospital"      => Ok(FacilitySubtype::Hospital),
            "shelter"       => Ok(FacilitySubtype::Shelter),
            "power_station" => Ok(FacilitySubtype::PowerStation),
            "school"        => Ok(FacilitySubtype::School),
            other => Err(GraphError::Parse(format!(
                "invalid facility subtype {other:?}: expected hospital, shelter, power_station, or school"
            ))),
        }
    }
}

/// Zone or facility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    FloodZone,
    Facility(FacilitySubtype),
}

impl NodeKind {
    #[inline]
    pub fn is_zone(self) -> bool {
        matches!(self, NodeKind::FloodZone)
    }

    #[inline]
    pub fn facility_subtype(self) -> Option<FacilitySubtype> {
        match self {
            NodeKind::Facility(s) => Some(s),
            NodeKind::FloodZone   => None,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A zone or facility in the infrastructure graph.
///
/// Zones carry `population`; facilities carry `capacity`.  The unused
/// field stays at zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub id:              String,
    /// Dense insertion position.  Assigned by the graph; never reused.
    pub idx:             NodeIdx,
    pub kind:            NodeKind,
    pub position:        GeoPoint,
    pub elevation_m:     f64,
    pub population:      u32,
    pub capacity:        u32,
    /// Standing water, metres.  Updated from flood observations.
    pub current_depth_m: f64,
    /// Last computed risk score in `[0, 100]`.  Output only.
    pub risk_score:      f64,
}

impl Node {
    /// Encode this node as a fixed-width feature vector (see [`FEATURE_NAMES`]).
    pub fn features(&self) -> [f32; FEATURE_WIDTH] {
        let subtype = self.kind.facility_subtype();
        let flag = |s: FacilitySubtype| if subtype == Some(s) { 1.0 } else { 0.0 };

        [
            (self.elevation_m / ELEVATION_SCALE_M) as f32,
            if self.kind.is_zone() { 1.0 } else { 0.0 },
            flag(FacilitySubtype::Hospital),
            flag(FacilitySubtype::Shelter),
            flag(FacilitySubtype::PowerStation),
            flag(FacilitySubtype::School),
            (self.current_depth_m / DEPTH_SCALE_M).clamp(0.0, 1.0) as f32,
            (self.population as f64 / POPULATION_SCALE).min(1.0) as f32,
        ]
    }
}
