//! Quick runoff assessment: flood impact from rainfall totals alone.
//!
//! No graph and no propagation.  Rain beyond the drainage capacity becomes
//! excess water; its ratio to [`HISTORICAL_MAX_EXCESS_MM`] is the flood
//! factor `f` in `[0, 1]`, and each zone floods to
//! `base_depth + 2 · f · vulnerability` (capped at the maximum depth).

use serde::{Deserialize, Serialize};

use fdt_core::ScenarioConfig;

use crate::{RainfallParams, ScenarioError, ScenarioResult};

/// Excess water that maps to a flood factor of 1.
pub const HISTORICAL_MAX_EXCESS_MM: f64 = 200.0;
/// Zones deeper than this count as affected.
pub const AFFECTED_DEPTH_M: f64 = 0.3;
/// Depth at which a zone's whole population is affected.
const FULL_EXPOSURE_DEPTH_M: f64 = 1.5;
/// Share of the storm duration at which the peak arrives.
const PEAK_FRACTION: f64 = 0.7;
const MAX_PEAK_HOURS: f64 = 12.0;
/// Flooding outlasts the rain by half again.
const DURATION_FACTOR: f64 = 1.5;

/// A zone as the quick assessment sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuickZone {
    pub id:            String,
    /// Standing water before the storm, metres.
    pub base_depth_m:  f64,
    /// Scales how much excess water reaches this zone, `0..=1`.
    pub vulnerability: f64,
    pub population:    u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodSeverity {
    Minor,
    Moderate,
    Severe,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthCategory {
    Low,
    Medium,
    High,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Standard,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuickSummary {
    pub total_rainfall_mm:        f64,
    pub excess_water_mm:          f64,
    pub flood_factor:             f64,
    pub severity:                 FloodSeverity,
    pub peak_time_hours:          f64,
    pub estimated_duration_hours: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AffectedZone {
    pub zone_id:             String,
    pub predicted_depth_m:   f64,
    pub depth_category:      DepthCategory,
    pub risk_score:          f64,
    pub affected_population: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action:   &'static str,
    pub message:  String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuickAssessment {
    pub summary:                   QuickSummary,
    /// Zones deeper than [`AFFECTED_DEPTH_M`], in input order.
    pub zones_affected:            Vec<AffectedZone>,
    pub total_affected_population: u64,
    /// Most urgent first.
    pub recommendations:           Vec<Recommendation>,
}

/// Assess `rainfall` over `zones`.  `tide_factor` plays no part here.
pub fn quick_assess(
    rainfall: &RainfallParams,
    zones:    &[QuickZone],
    config:   &ScenarioConfig,
) -> ScenarioResult<QuickAssessment> {
    let checks = [
        ("rainfall_mm_per_hour", rainfall.rainfall_mm_per_hour),
        ("duration_hours", rainfall.duration_hours),
        ("drainage_capacity_mm_per_hour", config.drainage_capacity_mm_per_hour),
    ];
    if let Some((name, v)) = checks.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
        return Err(ScenarioError::Config(format!("{name} must be finite and non-negative, got {v}")));
    }

    let hours = rainfall.duration_hours;
    let total_rainfall_mm = rainfall.rainfall_mm_per_hour * hours;
    let excess_water_mm = (total_rainfall_mm - config.drainage_capacity_mm_per_hour * hours).max(0.0);
    let flood_factor = (excess_water_mm / HISTORICAL_MAX_EXCESS_MM).min(1.0);

    let zones_affected: Vec<AffectedZone> = zones
        .iter()
        .filter_map(|z| {
            let depth = (z.base_depth_m + flood_factor * 2.0 * z.vulnerability).min(config.max_water_depth_m);
            (depth > AFFECTED_DEPTH_M).then(|| AffectedZone {
                zone_id:             z.id.clone(),
                predicted_depth_m:   round_to(depth, 2),
                depth_category:      depth_category(depth),
                risk_score:          round_to((30.0 + depth * 30.0).min(100.0), 1),
                affected_population: (f64::from(z.population) * (depth / FULL_EXPOSURE_DEPTH_M).min(1.0)) as u32,
            })
        })
        .collect();
    let total_affected_population = zones_affected.iter().map(|z| u64::from(z.affected_population)).sum();

    let severity = match flood_factor {
        f if f > 0.7 => FloodSeverity::Severe,
        f if f > 0.4 => FloodSeverity::Moderate,
        _ => FloodSeverity::Minor,
    };

    Ok(QuickAssessment {
        summary: QuickSummary {
            total_rainfall_mm,
            excess_water_mm: round_to(excess_water_mm, 1),
            flood_factor,
            severity,
            peak_time_hours: round_to((hours * PEAK_FRACTION).min(MAX_PEAK_HOURS), 1),
            estimated_duration_hours: round_to(hours * DURATION_FACTOR, 1),
        },
        recommendations: recommendations(flood_factor, &zones_affected, total_affected_population),
        zones_affected,
        total_affected_population,
    })
}

/// Action list for a flood factor and the zones it affects.
pub fn recommendations(flood_factor: f64, affected: &[AffectedZone], evacuees: u64) -> Vec<Recommendation> {
    let ids_where = |keep: fn(DepthCategory) -> bool| {
        let ids: Vec<&str> = affected
            .iter()
            .filter(|z| keep(z.depth_category))
            .map(|z| z.zone_id.as_str())
            .collect();
        if ids.is_empty() { "low-lying zones".to_string() } else { ids.join(", ") }
    };
    let rec = |priority, action, message: String| Recommendation { priority, action, message };

    let mut out = Vec::new();
    if flood_factor > 0.7 {
        out.push(rec(
            Priority::Critical,
            "Immediate evacuation",
            format!("Evacuate {} immediately", ids_where(|c| c == DepthCategory::High)),
        ));
        out.push(rec(
            Priority::High,
            "Close roads",
            "Close roads through flooded zones and keep alternates under watch".to_string(),
        ));
    } else if flood_factor > 0.4 {
        out.push(rec(
            Priority::High,
            "Prepare evacuation",
            format!("Prepare evacuation for {}", ids_where(|c| c != DepthCategory::Low)),
        ));
        out.push(rec(
            Priority::Medium,
            "Monitor roads",
            "Monitor water levels on evacuation routes".to_string(),
        ));
    } else if flood_factor > 0.2 {
        out.push(rec(
            Priority::Medium,
            "Alert residents",
            format!("Issue flood warning for {}", ids_where(|_| true)),
        ));
    }

    if !affected.is_empty() {
        out.push(rec(
            Priority::Standard,
            "Activate shelters",
            format!("Ready shelters to receive up to {evacuees} evacuees"),
        ));
    }
    out
}

fn depth_category(depth: f64) -> DepthCategory {
    if depth > 1.5 {
        DepthCategory::High
    } else if depth > 0.5 {
        DepthCategory::Medium
    } else {
        DepthCategory::Low
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}
