//! Flat input records supplied by the surrounding system.
//!
//! # CSV format
//!
//! Columns marked optional may be omitted from the header entirely;
//! `capacity`, `origin_zone_id`, `length_km`, `estimated_time_minutes` and
//! `risk_score` may also be left empty.
//!
//! ```csv
//! # zones
//! id,lat,lon,population
//! hatyai_center,7.0086,100.4747,45000
//!
//! # shelters (current_occupancy, operational optional)
//! id,lat,lon,capacity,current_occupancy,operational
//! shelter_psu,7.0072,100.4980,2000,150,true
//!
//! # routes (all but id optional)
//! id,origin_zone_id,status,passable,current_water_depth,length_km,estimated_time_minutes,risk_score
//! r1,hatyai_center,open,true,0.1,3.2,12,15
//! ```

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use fdt_core::GeoPoint;

use crate::{EvacError, EvacResult};

/// Capacity assumed by the planner for a shelter with no declared capacity.
pub const PLANNING_DEFAULT_CAPACITY: u32 = 1_000;

const DEFAULT_ROUTE_LENGTH_KM: f64 = 5.0;
const DEFAULT_ROUTE_ETA_MINUTES: f64 = 15.0;
const DEFAULT_ROUTE_RISK: f64 = 20.0;

// ── Zones ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub id:         String,
    pub lat:        f64,
    pub lon:        f64,
    pub population: u32,
}

impl ZoneRecord {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::from_degrees(self.lat, self.lon)
    }
}

// ── Shelters ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShelterRecord {
    pub id:                String,
    pub lat:               f64,
    pub lon:               f64,
    /// `None` when the source did not declare a capacity.
    #[serde(default)]
    pub capacity:          Option<u32>,
    /// Occupancy reported by the field, independent of any simulation.
    #[serde(default)]
    pub current_occupancy: u32,
    #[serde(default = "default_true")]
    pub operational:       bool,
}

impl ShelterRecord {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::from_degrees(self.lat, self.lon)
    }

    /// Capacity used by the environment: undeclared means 0.
    pub fn env_capacity(&self) -> u32 {
        self.capacity.unwrap_or(0)
    }

    /// Capacity reserved against by the planner: undeclared means
    /// [`PLANNING_DEFAULT_CAPACITY`].
    pub fn planning_capacity(&self) -> u32 {
        self.capacity.unwrap_or(PLANNING_DEFAULT_CAPACITY)
    }

    /// Declared capacity minus reported occupancy.  Negative when
    /// over-full.
    pub fn remaining_capacity(&self) -> i64 {
        i64::from(self.env_capacity()) - i64::from(self.current_occupancy)
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    #[default]
    Open,
    AtRisk,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id:                     String,
    #[serde(default)]
    pub origin_zone_id:         Option<String>,
    #[serde(default)]
    pub status:                 RouteStatus,
    #[serde(default = "default_true")]
    pub passable:               bool,
    #[serde(default)]
    pub current_water_depth:    f64,
    #[serde(default)]
    pub length_km:              Option<f64>,
    #[serde(default)]
    pub estimated_time_minutes: Option<f64>,
    #[serde(default)]
    pub risk_score:             Option<f64>,
}

impl RouteRecord {
    /// A passable, open route with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id:                     id.into(),
            origin_zone_id:         None,
            status:                 RouteStatus::Open,
            passable:               true,
            current_water_depth:    0.0,
            length_km:              None,
            estimated_time_minutes: None,
            risk_score:             None,
        }
    }

    pub fn length_or_default(&self) -> f64 {
        self.length_km.unwrap_or(DEFAULT_ROUTE_LENGTH_KM)
    }

    pub fn eta_or_default(&self) -> f64 {
        self.estimated_time_minutes.unwrap_or(DEFAULT_ROUTE_ETA_MINUTES)
    }

    pub fn risk_or_default(&self) -> f64 {
        self.risk_score.unwrap_or(DEFAULT_ROUTE_RISK)
    }
}

fn default_true() -> bool {
    true
}

// ── CSV loading ───────────────────────────────────────────────────────────────

/// Parse records of any of the three kinds from a CSV source.
pub fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> EvacResult<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv_reader
        .deserialize::<T>()
        .map(|row| row.map_err(|e| EvacError::Parse(e.to_string())))
        .collect()
}

/// Like [`read_records`] but opens `path`.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> EvacResult<Vec<T>> {
    let file = std::fs::File::open(path)?;
    read_records(file)
}
