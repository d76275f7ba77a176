//! The Evacuation Planner.
//!
//! Turns one policy query plus current conditions into a plan without
//! running an episode:
//!
//! 1. Build a fresh [`EvacuationEnv`], inject the flood state, observe.
//! 2. Ask the policy for action probabilities once.
//! 3. Rank zones by `10 · depth + population / 1000` (stable, descending).
//! 4. For each zone at or above 0.3 m, reserve the open shelter with the
//!    highest probability for that pair and attach a route.  A zone whose
//!    pairs all lack a finite probability stays unassigned.
//! 5. Flag roads deeper than 0.3 m for closure.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use fdt_core::{DepthMap, EvacuationConfig};

use crate::env::EVACUATION_MIN_DEPTH_M;
use crate::routes::{roads_to_close, select_route};
use crate::{EvacuationEnv, Policy, RouteRecord, ShelterRecord, ZoneRecord};

const DEPTH_PRIORITY_WEIGHT: f64 = 10.0;
const POPULATION_PRIORITY_DIVISOR: f64 = 1_000.0;
const HOURS_PER_PRIORITY_ZONE: f64 = 0.5;

/// Everything one planning call consumes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanningRequest {
    pub flood_state: DepthMap,
    pub zones:       Vec<ZoneRecord>,
    pub shelters:    Vec<ShelterRecord>,
    pub routes:      Vec<RouteRecord>,
    /// When set, only these shelters are considered.
    pub shelter_allow_list: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendedRoute {
    pub from_zone:   String,
    pub to_shelter:  String,
    /// Empty when no route exists at all.
    pub route_ids:   Vec<String>,
    pub distance_km: f64,
    pub eta_minutes: f64,
    pub risk_score:  f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EvacuationPlan {
    pub recommended_routes:         Vec<RecommendedRoute>,
    pub shelter_assignments:        BTreeMap<String, String>,
    /// Zones at or above the evacuation depth, most urgent first.
    pub priority_order:             Vec<String>,
    pub roads_to_close:             Vec<String>,
    /// Sum of the populations of assigned zones.
    pub total_evacuees:             u64,
    pub estimated_completion_hours: f64,
}

/// Plans with a fixed policy.
pub struct EvacuationPlanner<P: Policy> {
    policy: P,
    config: EvacuationConfig,
}

impl<P: Policy> EvacuationPlanner<P> {
    pub fn new(policy: P) -> Self {
        Self::with_config(policy, EvacuationConfig::default())
    }

    pub fn with_config(policy: P, config: EvacuationConfig) -> Self {
        Self { policy, config }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Produce a plan.  Never fails: missing shelters or routes yield empty
    /// or placeholder output.
    pub fn plan(&self, request: &PlanningRequest) -> EvacuationPlan {
        let started = Instant::now();

        let shelters: Vec<ShelterRecord> = match &request.shelter_allow_list {
            Some(allowed) => request
                .shelters
                .iter()
                .filter(|s| allowed.contains(&s.id))
                .cloned()
                .collect(),
            None => request.shelters.clone(),
        };

        let mut env = EvacuationEnv::with_config(
            request.zones.clone(),
            shelters,
            request.routes.clone(),
            &self.config,
        );
        env.update_flood_state(&request.flood_state);
        let probs = self.policy.action_probabilities(&env.observation());

        // ── Priority ranking ──────────────────────────────────────────────
        let zones = env.zones();
        let shelters = env.shelters();
        let mut ranked: Vec<(usize, f64, f64)> = zones
            .iter()
            .enumerate()
            .map(|(i, z)| {
                let depth = request.flood_state.get(&z.id).copied().unwrap_or(0.0);
                let score = DEPTH_PRIORITY_WEIGHT * depth + f64::from(z.population) / POPULATION_PRIORITY_DIVISOR;
                (i, score, depth)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        // ── Assignment ────────────────────────────────────────────────────
        let mut remaining: Vec<i64> = shelters.iter().map(|s| i64::from(s.planning_capacity())).collect();
        let mut plan = EvacuationPlan::default();

        for &(zi, _, depth) in &ranked {
            if depth < EVACUATION_MIN_DEPTH_M {
                continue;
            }
            let zone = &zones[zi];
            plan.priority_order.push(zone.id.clone());

            // Pairs the policy gave no finite probability for are never chosen.
            let mut best: Option<(usize, f32)> = None;
            for (si, _) in shelters.iter().enumerate().filter(|&(si, _)| remaining[si] > 0) {
                let Some(&p) = probs.get(zi * shelters.len() + si) else { continue };
                if p.is_finite() && best.is_none_or(|(_, bp)| p > bp) {
                    best = Some((si, p));
                }
            }

            if let Some((si, _)) = best {
                let shelter = &shelters[si];
                plan.shelter_assignments.insert(zone.id.clone(), shelter.id.clone());
                plan.recommended_routes.push(select_route(&zone.id, &shelter.id, env.routes()));
                remaining[si] -= i64::from(zone.population);
                plan.total_evacuees += u64::from(zone.population);
            }
        }

        plan.roads_to_close = roads_to_close(env.routes());
        plan.estimated_completion_hours = HOURS_PER_PRIORITY_ZONE * plan.priority_order.len() as f64;

        debug!(
            zones = zones.len(),
            shelters = shelters.len(),
            assigned = plan.shelter_assignments.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "evacuation plan generated"
        );
        plan
    }
}
