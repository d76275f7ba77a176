//! `fdt-sim` — rainfall scenario driver.
//!
//! Replays a synthetic storm over an infrastructure graph: at every time
//! step zone depths are derived from rainfall intensity, elevation and tide,
//! then risk is re-propagated one hour ahead.
//!
//! # Depth model
//!
//! ```text
//! for step s in 0..N:                      N = duration · 60 / step_minutes
//!   rain  = rainfall · (0.5 + 0.5 · sin(π · s / N))      peak mid-storm
//!   base  = (rain / 50) · (s / N) · 2                     accumulation
//!   depth = clamp(base · (15 − elevation) / 15 · tide, 0, max_depth)
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut scenario = ScenarioBuilder::new(graph, RiskEngine::from_config(&cfg.risk))
//!     .rainfall(RainfallParams { rainfall_mm_per_hour: 80.0, ..Default::default() })
//!     .config(cfg.scenario.clone())
//!     .build()?;
//! let summary = scenario.run(&mut NoopObserver)?;
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                         |
//! |--------------|--------------------------------------------------|
//! | [`builder`]  | `ScenarioBuilder`                                |
//! | [`scenario`] | `Scenario`, `RainfallParams`, `ScenarioSummary`  |
//! | [`observer`] | `ScenarioObserver`, `NoopObserver`, `StepReport` |
//! | [`quick`]    | `quick_assess` runoff heuristic, recommendations |
//! | [`error`]    | `ScenarioError`, `ScenarioResult<T>`             |

pub mod builder;
pub mod error;
pub mod observer;
pub mod quick;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use builder::ScenarioBuilder;
pub use error::{ScenarioError, ScenarioResult};
pub use observer::{NoopObserver, ScenarioObserver, StepReport};
pub use quick::{
    AffectedZone, DepthCategory, FloodSeverity, Priority, QuickAssessment, QuickSummary, QuickZone,
    Recommendation, quick_assess,
};
pub use scenario::{RainfallParams, Scenario, ScenarioSummary};
