//! Scenario observer trait for progress reporting and data collection.

use fdt_core::DepthMap;
use fdt_risk::RiskPropagationResult;

use crate::ScenarioSummary;

/// Everything known about one completed step.
pub struct StepReport<'a> {
    /// Zero-based.
    pub step:                 u32,
    pub total_steps:          u32,
    /// `(step + 1) / total_steps · 100`.
    pub progress_percent:     f64,
    pub rainfall_mm_per_hour: f64,
    pub flood_depths:         &'a DepthMap,
    pub risk:                 &'a RiskPropagationResult,
}

/// Callbacks invoked by [`Scenario::run`][crate::Scenario::run].
///
/// Both methods default to no-ops.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl ScenarioObserver for Progress {
///     fn on_step(&mut self, r: &StepReport<'_>) {
///         println!("{:>5.1}%  warnings={}", r.progress_percent, r.risk.critical_warnings.len());
///     }
/// }
/// ```
pub trait ScenarioObserver {
    fn on_step(&mut self, _report: &StepReport<'_>) {}

    /// Called once after the final step.
    fn on_end(&mut self, _summary: &ScenarioSummary) {}
}

/// A [`ScenarioObserver`] that does nothing.
pub struct NoopObserver;

impl ScenarioObserver for NoopObserver {}
