//! `Scenario` — the storm replay loop.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use fdt_core::DepthMap;
use fdt_graph::InfrastructureGraph;
use fdt_risk::{RiskEngine, RiskPropagationResult};

use crate::{ScenarioError, ScenarioObserver, ScenarioResult, StepReport};

/// Rainfall that yields a base depth of 1 m per unit of storm progress.
const REFERENCE_RAINFALL_MM: f64 = 50.0;
/// Elevation at and above which a zone stays dry.
const DRY_ELEVATION_M: f64 = 15.0;

/// Storm shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainfallParams {
    pub rainfall_mm_per_hour: f64,
    pub duration_hours:       f64,
    /// Multiplier for tidal backwater; 1.0 is neutral.
    pub tide_factor:          f64,
}

impl Default for RainfallParams {
    fn default() -> Self {
        Self { rainfall_mm_per_hour: 50.0, duration_hours: 12.0, tide_factor: 1.0 }
    }
}

/// Aggregates over a whole run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub steps:           u32,
    pub peak_depth_m:    f64,
    /// Highest risk each zone reached at any step.
    pub peak_zone_risk:  BTreeMap<String, f64>,
    /// Facility warnings summed over all steps.
    pub warnings_issued: usize,
    /// Propagation result of the last step.
    pub final_result:    Option<RiskPropagationResult>,
}

/// A ready-to-run storm replay.  Build with
/// [`ScenarioBuilder`][crate::ScenarioBuilder].
pub struct Scenario {
    pub(crate) engine:       RiskEngine,
    pub(crate) rainfall:     RainfallParams,
    pub(crate) total_steps:  u32,
    pub(crate) max_depth_m:  f64,
    /// `(zone id, elevation)` in graph insertion order.
    pub(crate) zones:        Vec<(String, f64)>,
}

impl Scenario {
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn rainfall(&self) -> &RainfallParams {
        &self.rainfall
    }

    pub fn graph(&self) -> Option<&InfrastructureGraph> {
        self.engine.graph()
    }

    /// Release the engine (with its graph attached).
    pub fn into_engine(self) -> RiskEngine {
        self.engine
    }

    /// Rainfall intensity at `step`.
    pub fn rainfall_at(&self, step: u32) -> f64 {
        let phase = f64::from(step) / f64::from(self.total_steps);
        self.rainfall.rainfall_mm_per_hour * (0.5 + 0.5 * (PI * phase).sin())
    }

    /// Zone depths at `step`.
    pub fn depths_at(&self, step: u32) -> DepthMap {
        let phase = f64::from(step) / f64::from(self.total_steps);
        let base = self.rainfall_at(step) / REFERENCE_RAINFALL_MM * phase * 2.0;
        self.zones
            .iter()
            .map(|(id, elevation)| {
                let elevation_factor = (DRY_ELEVATION_M - elevation) / DRY_ELEVATION_M;
                let depth = (base * elevation_factor * self.rainfall.tide_factor).clamp(0.0, self.max_depth_m);
                (id.clone(), depth)
            })
            .collect()
    }

    /// Run every step, notifying `observer`.  The first propagation failure
    /// aborts the run.
    #[instrument(skip_all, fields(steps = self.total_steps))]
    pub fn run<O: ScenarioObserver>(&mut self, observer: &mut O) -> ScenarioResult<ScenarioSummary> {
        let mut summary = ScenarioSummary::default();

        for step in 0..self.total_steps {
            let depths = self.depths_at(step);
            let risk = self
                .engine
                .propagate(&depths, 1)
                .map_err(|source| ScenarioError::Step { step, source })?;

            summary.steps += 1;
            summary.peak_depth_m = depths.values().copied().fold(summary.peak_depth_m, f64::max);
            for (id, &score) in &risk.zone_risk_scores {
                let peak = summary.peak_zone_risk.entry(id.clone()).or_insert(score);
                *peak = peak.max(score);
            }
            summary.warnings_issued += risk.critical_warnings.len();

            observer.on_step(&StepReport {
                step,
                total_steps: self.total_steps,
                progress_percent: f64::from(step + 1) / f64::from(self.total_steps) * 100.0,
                rainfall_mm_per_hour: self.rainfall_at(step),
                flood_depths: &depths,
                risk: &risk,
            });
            summary.final_result = Some(risk);
        }

        info!(
            steps = summary.steps,
            peak_depth_m = summary.peak_depth_m,
            warnings = summary.warnings_issued,
            "scenario complete"
        );
        observer.on_end(&summary);
        Ok(summary)
    }
}
