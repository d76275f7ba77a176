//! The Evacuation Environment: a single-scenario MDP simulator.
//!
//! # Encoding
//!
//! Zones and shelters are indexed in input order.  An action `a` selects
//! zone `(a / S) mod Z` and shelter `(a mod S)` for `Z` zones and `S`
//! shelters; every `usize` is a valid action.
//!
//! # Observation layout
//!
//! ```text
//! [ depth(z₀) … depth(z_Z) | remaining_pop(z)/10 000 … | remaining_cap(s)/1 000 … | 0 … ]
//! ```
//!
//! zero-padded or truncated to `observation_width` (default 64).
//!
//! # Ownership
//!
//! One environment models exactly one scenario.  Build a fresh one per
//! planning request; it is never shared.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use fdt_core::{DepthMap, EvacuationConfig};

use crate::{RouteRecord, ShelterRecord, ZoneRecord};

/// Zones at or below this depth are not evacuated.
pub const EVACUATION_MIN_DEPTH_M: f64 = 0.3;
/// Zones above this depth must be emptied before the episode can end.
pub const AT_RISK_DEPTH_M: f64 = 0.5;
/// Above this depth evacuations earn the high-risk bonus.
pub const HIGH_RISK_DEPTH_M: f64 = 1.0;

const REWARD_PER_PERSON: f64 = 0.01;
const HIGH_RISK_BONUS_PER_PERSON: f64 = 0.02;
const CASUALTY_RATE: f64 = 0.1;
const FULL_SHELTER_PENALTY: f64 = 0.1;
const WASTED_ACTION_PENALTY: f64 = 0.05;
const TIME_PENALTY: f64 = 0.01;

const POPULATION_NORM: f32 = 10_000.0;
const CAPACITY_NORM: f32 = 1_000.0;

// ── State ─────────────────────────────────────────────────────────────────────

/// Mutable scenario state.  Vectors are indexed like the environment's
/// zone and shelter lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EvacuationState {
    pub flood_depth:       Vec<f64>,
    pub evacuated:         Vec<u32>,
    pub shelter_occupancy: Vec<u32>,
    pub time_step:         u32,
}

// ── Step results ──────────────────────────────────────────────────────────────

/// What a step did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// People were moved.
    Evacuated,
    /// The zone needed evacuating but the shelter had no room.
    ShelterFull,
    /// The zone was dry enough or already empty, or there was nothing to
    /// choose from.
    Wasted,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepInfo {
    pub outcome:            ActionOutcome,
    pub zone_id:            Option<String>,
    pub shelter_id:         Option<String>,
    pub evacuated:          u32,
    pub casualties_avoided: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepOutcome {
    pub observation: Vec<f32>,
    pub reward:      f64,
    pub done:        bool,
    pub info:        StepInfo,
}

// ── Environment ───────────────────────────────────────────────────────────────

pub struct EvacuationEnv {
    zones:             Vec<ZoneRecord>,
    shelters:          Vec<ShelterRecord>,
    routes:            Vec<RouteRecord>,
    observation_width: usize,
    max_steps:         u32,
    per_step_cap:      u32,
    state:             EvacuationState,
}

impl EvacuationEnv {
    /// Environment with default horizon (100), per-step cap (500) and
    /// observation width (64).
    pub fn new(zones: Vec<ZoneRecord>, shelters: Vec<ShelterRecord>, routes: Vec<RouteRecord>) -> Self {
        Self::with_config(zones, shelters, routes, &EvacuationConfig::default())
    }

    /// Repeated ids keep their first record; later ones are dropped with a
    /// warning.  A zero `per_step_cap` is raised to 1.
    pub fn with_config(
        zones:    Vec<ZoneRecord>,
        shelters: Vec<ShelterRecord>,
        routes:   Vec<RouteRecord>,
        cfg:      &EvacuationConfig,
    ) -> Self {
        let mut env = Self {
            zones:             dedup_by_id(zones, |z| &z.id, "zone"),
            shelters:          dedup_by_id(shelters, |s| &s.id, "shelter"),
            routes,
            observation_width: cfg.observation_width,
            max_steps:         cfg.max_steps,
            per_step_cap:      cfg.per_step_cap.max(1),
            state:             EvacuationState::default(),
        };
        env.reset();
        env
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn zones(&self) -> &[ZoneRecord] {
        &self.zones
    }

    pub fn shelters(&self) -> &[ShelterRecord] {
        &self.shelters
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn state(&self) -> &EvacuationState {
        &self.state
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Number of distinct `(zone, shelter)` pairs.
    pub fn action_count(&self) -> usize {
        self.zones.len() * self.shelters.len()
    }

    pub fn zone_index(&self, id: &str) -> Option<usize> {
        self.zones.iter().position(|z| z.id == id)
    }

    pub fn shelter_index(&self, id: &str) -> Option<usize> {
        self.shelters.iter().position(|s| s.id == id)
    }

    pub fn evacuated(&self, zone_id: &str) -> Option<u32> {
        self.zone_index(zone_id).map(|i| self.state.evacuated[i])
    }

    pub fn occupancy(&self, shelter_id: &str) -> Option<u32> {
        self.shelter_index(shelter_id).map(|i| self.state.shelter_occupancy[i])
    }

    pub fn flood_depth(&self, zone_id: &str) -> Option<f64> {
        self.zone_index(zone_id).map(|i| self.state.flood_depth[i])
    }

    /// People still in zone `i`.
    fn remaining_population(&self, i: usize) -> u32 {
        self.zones[i].population.saturating_sub(self.state.evacuated[i])
    }

    /// Free places in shelter `j`.
    fn remaining_capacity(&self, j: usize) -> u32 {
        self.shelters[j].env_capacity().saturating_sub(self.state.shelter_occupancy[j])
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Zero every mutable quantity, flood depths included, and return the
    /// initial observation.
    pub fn reset(&mut self) -> Vec<f32> {
        self.state = EvacuationState {
            flood_depth:       vec![0.0; self.zones.len()],
            evacuated:         vec![0; self.zones.len()],
            shelter_occupancy: vec![0; self.shelters.len()],
            time_step:         0,
        };
        self.observation()
    }

    /// Merge current flood depths.  Ids that are not zones are ignored.
    pub fn update_flood_state(&mut self, depths: &DepthMap) {
        for (i, zone) in self.zones.iter().enumerate() {
            if let Some(&d) = depths.get(&zone.id) {
                self.state.flood_depth[i] = d;
            }
        }
    }

    /// Current observation vector, exactly `observation_width` long.
    pub fn observation(&self) -> Vec<f32> {
        let mut obs = Vec::with_capacity(self.zones.len() * 2 + self.shelters.len());
        obs.extend(self.state.flood_depth.iter().map(|&d| d as f32));
        obs.extend((0..self.zones.len()).map(|i| self.remaining_population(i) as f32 / POPULATION_NORM));
        obs.extend((0..self.shelters.len()).map(|j| self.remaining_capacity(j) as f32 / CAPACITY_NORM));
        obs.resize(self.observation_width, 0.0);
        obs
    }

    /// `true` once the horizon is reached or every zone deeper than
    /// [`AT_RISK_DEPTH_M`] is empty.
    pub fn is_done(&self) -> bool {
        self.state.time_step >= self.max_steps || self.all_at_risk_evacuated()
    }

    fn all_at_risk_evacuated(&self) -> bool {
        (0..self.zones.len())
            .filter(|&i| self.state.flood_depth[i] > AT_RISK_DEPTH_M)
            .all(|i| self.remaining_population(i) == 0)
    }

    /// Decode `action` into `(zone_index, shelter_index)`.  `None` when
    /// there are no zones or no shelters.
    pub fn decode_action(&self, action: usize) -> Option<(usize, usize)> {
        let (z, s) = (self.zones.len(), self.shelters.len());
        if z == 0 || s == 0 {
            return None;
        }
        Some(((action / s) % z, action % s))
    }

    /// Apply one transition.
    pub fn step(&mut self, action: usize) -> StepOutcome {
        let mut info = StepInfo {
            outcome:            ActionOutcome::Wasted,
            zone_id:            None,
            shelter_id:         None,
            evacuated:          0,
            casualties_avoided: 0,
        };
        let mut reward = 0.0;

        match self.decode_action(action) {
            Some((zi, si)) => {
                info.zone_id = Some(self.zones[zi].id.clone());
                info.shelter_id = Some(self.shelters[si].id.clone());

                let depth = self.state.flood_depth[zi];
                let remaining = self.remaining_population(zi);
                if depth > EVACUATION_MIN_DEPTH_M && remaining > 0 {
                    let moved = remaining.min(self.remaining_capacity(si)).min(self.per_step_cap);
                    if moved > 0 {
                        self.state.evacuated[zi] += moved;
                        self.state.shelter_occupancy[si] += moved;
                        reward += f64::from(moved) * REWARD_PER_PERSON;
                        if depth > HIGH_RISK_DEPTH_M {
                            reward += f64::from(moved) * HIGH_RISK_BONUS_PER_PERSON;
                            info.casualties_avoided = (f64::from(moved) * CASUALTY_RATE * depth) as u32;
                        }
                        info.evacuated = moved;
                        info.outcome = ActionOutcome::Evacuated;
                    } else {
                        reward -= FULL_SHELTER_PENALTY;
                        info.outcome = ActionOutcome::ShelterFull;
                    }
                } else {
                    reward -= WASTED_ACTION_PENALTY;
                }
            }
            None => reward -= WASTED_ACTION_PENALTY,
        }

        reward -= TIME_PENALTY;
        self.state.time_step += 1;

        StepOutcome {
            observation: self.observation(),
            reward,
            done: self.is_done(),
            info,
        }
    }
}

fn dedup_by_id<T>(records: Vec<T>, id: impl Fn(&T) -> &String, what: &str) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(id(r).clone());
            if !fresh {
                warn!(id = %id(r), kind = what, "duplicate record ignored");
            }
            fresh
        })
        .collect()
}
