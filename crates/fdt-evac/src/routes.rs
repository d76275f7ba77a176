//! Route selection and closure flags.

use crate::{RecommendedRoute, RouteRecord, RouteStatus};

/// Routes deeper than this are flagged for closure.
pub const CLOSURE_DEPTH_M: f64 = 0.3;

const WATER_DEPTH_WEIGHT: f64 = 10.0;

const FALLBACK_DISTANCE_KM: f64 = 5.0;
const FALLBACK_ETA_MINUTES: f64 = 15.0;
const FALLBACK_RISK: f64 = 20.0;

/// Best route for evacuating `zone_id` to `shelter_id`.
///
/// Candidates are routes originating at the zone or currently open; the
/// winner minimises `10 · water_depth + length_km` (first wins on ties).
/// Without candidates a placeholder is returned that references the first
/// route, or no route at all when `routes` is empty.
pub fn select_route(zone_id: &str, shelter_id: &str, routes: &[RouteRecord]) -> RecommendedRoute {
    let cost = |r: &RouteRecord| WATER_DEPTH_WEIGHT * r.current_water_depth + r.length_or_default();

    let best = routes
        .iter()
        .filter(|r| r.origin_zone_id.as_deref() == Some(zone_id) || r.status == RouteStatus::Open)
        .fold(None::<&RouteRecord>, |best, r| match best {
            Some(b) if cost(b) <= cost(r) => Some(b),
            _ => Some(r),
        });

    match best {
        Some(r) => RecommendedRoute {
            from_zone:   zone_id.to_string(),
            to_shelter:  shelter_id.to_string(),
            route_ids:   vec![r.id.clone()],
            distance_km: r.length_or_default(),
            eta_minutes: r.eta_or_default(),
            risk_score:  r.risk_or_default(),
        },
        None => RecommendedRoute {
            from_zone:   zone_id.to_string(),
            to_shelter:  shelter_id.to_string(),
            route_ids:   routes.first().map(|r| r.id.clone()).into_iter().collect(),
            distance_km: FALLBACK_DISTANCE_KM,
            eta_minutes: FALLBACK_ETA_MINUTES,
            risk_score:  FALLBACK_RISK,
        },
    }
}

/// Ids of routes whose water depth exceeds [`CLOSURE_DEPTH_M`], in input
/// order.
pub fn roads_to_close(routes: &[RouteRecord]) -> Vec<String> {
    routes
        .iter()
        .filter(|r| r.current_water_depth > CLOSURE_DEPTH_M)
        .map(|r| r.id.clone())
        .collect()
}

/// Routes matching `status` (any when `None`), optionally passable only.
pub fn filter_routes(routes: &[RouteRecord], status: Option<RouteStatus>, passable_only: bool) -> Vec<&RouteRecord> {
    routes
        .iter()
        .filter(|r| status.is_none_or(|s| r.status == s))
        .filter(|r| !passable_only || r.passable)
        .collect()
}
