//! Output records of one propagation call.
//!
//! All types are plain data: produced fresh by every call and serialised by
//! the caller.

use std::collections::BTreeMap;

use serde::Serialize;

use fdt_graph::{DepthMap, FacilitySubtype};

/// Base depth (m) a zone must exceed at hour 0 to be reported flooded.
pub const CASCADE_BASE_DEPTH_M: f64 = 0.5;
/// Added to the threshold for every hour ahead.
pub const CASCADE_DEPTH_STEP_M: f64 = 0.1;

/// Severity of a facility warning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    High,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriticalWarning {
    pub facility_id:      String,
    pub facility_subtype: FacilitySubtype,
    pub score:            f64,
    pub level:            WarningLevel,
    pub message:          String,
}

impl CriticalWarning {
    pub(crate) fn new(facility_id: &str, facility_subtype: FacilitySubtype, score: f64, critical_above: f64) -> Self {
        Self {
            facility_id: facility_id.to_string(),
            facility_subtype,
            score,
            level: if score > critical_above { WarningLevel::Critical } else { WarningLevel::High },
            message: format!("{facility_id} at {score:.0}% risk of flood impact"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CascadeEvent {
    pub zone_id: String,
    /// Always `"flooded"`.
    pub event:   &'static str,
    pub depth:   f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub hour:   u32,
    pub events: Vec<CascadeEvent>,
}

/// Everything one `propagate` call produces.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RiskPropagationResult {
    pub zone_risk_scores:     BTreeMap<String, f64>,
    pub facility_risk_scores: BTreeMap<String, f64>,
    /// Sorted by descending score; ties keep node insertion order.
    pub critical_warnings:    Vec<CriticalWarning>,
    pub cascade_timeline:     Vec<TimelineEntry>,
}

/// Hourly flooding events over `hours` steps.
///
/// At hour `h` every entry of `depths` deeper than `0.5 + 0.1·h` is
/// reported.  Depths stay fixed over the horizon, so event counts can only
/// shrink as the threshold rises.  Hours without events are omitted.
/// Events within an hour are ordered by zone id.
pub fn simulate_cascade(depths: &DepthMap, hours: u32) -> Vec<TimelineEntry> {
    let mut sorted: Vec<(&String, f64)> = depths.iter().map(|(id, &d)| (id, d)).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    (0..hours)
        .filter_map(|hour| {
            let threshold = CASCADE_BASE_DEPTH_M + CASCADE_DEPTH_STEP_M * f64::from(hour);
            let events: Vec<CascadeEvent> = sorted
                .iter()
                .filter(|(_, depth)| *depth > threshold)
                .map(|(id, depth)| CascadeEvent {
                    zone_id: (*id).clone(),
                    event:   "flooded",
                    depth:   *depth,
                })
                .collect();
            (!events.is_empty()).then_some(TimelineEntry { hour, events })
        })
        .collect()
}
