//! Engine configuration.
//!
//! Loaded from TOML by the application crate and handed to the engine
//! constructors.  Every field has a default, so an empty document (or a
//! missing section) yields the stock configuration.
//!
//! ```toml
//! [risk]
//! rounds = 3
//! params_path = "models/gnn.json"
//! fallback = "prior"
//!
//! [evacuation]
//! max_steps = 100
//!
//! [logging]
//! filter = "info,fdt_risk=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{FdtError, FdtResult};

/// Top-level configuration for both engines and the scenario driver.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub risk:       RiskConfig,
    pub evacuation: EvacuationConfig,
    pub scenario:   ScenarioConfig,
    pub logging:    LoggingConfig,
}

impl EngineConfig {
    /// Parse a TOML document and [`validate`](Self::validate) it.
    pub fn from_toml_str(s: &str) -> FdtResult<Self> {
        let cfg: Self = toml::from_str(s).map_err(|e| FdtError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no engine can run with.
    pub fn validate(&self) -> FdtResult<()> {
        let fail = |msg: &str| Err(FdtError::Config(msg.to_string()));
        if self.evacuation.per_step_cap == 0 {
            return fail("evacuation.per_step_cap must be positive");
        }
        if self.evacuation.max_steps == 0 {
            return fail("evacuation.max_steps must be positive");
        }
        if self.scenario.time_step_minutes == 0 {
            return fail("scenario.time_step_minutes must be positive");
        }
        let drainage = self.scenario.drainage_capacity_mm_per_hour;
        if !(drainage.is_finite() && drainage >= 0.0) {
            return fail("scenario.drainage_capacity_mm_per_hour must be finite and non-negative");
        }
        if !(self.risk.warning_threshold.is_finite() && self.risk.critical_threshold.is_finite()) {
            return fail("risk thresholds must be finite");
        }
        Ok(())
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> FdtResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// What to run with when a trained parameter file cannot be loaded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamFallback {
    /// Deterministic hand-built parameters encoding the hydraulic prior.
    #[default]
    Prior,
    /// Xavier-uniform initialisation from `seed`.
    Seeded,
}

/// Risk Propagation Engine settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Width of the per-node hidden vector.
    pub hidden_channels: usize,
    /// Number of message-passing rounds.
    pub rounds: usize,
    /// JSON parameter file; `None` runs on the fallback parameters.
    pub params_path: Option<PathBuf>,
    pub fallback: ParamFallback,
    pub seed: u64,
    /// Facilities scoring strictly above this get a warning.
    pub warning_threshold: f64,
    /// Warnings scoring strictly above this are "critical", else "high".
    pub critical_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            hidden_channels:    64,
            rounds:             3,
            params_path:        None,
            fallback:           ParamFallback::Prior,
            seed:               42,
            warning_threshold:  70.0,
            critical_threshold: 85.0,
        }
    }
}

/// Evacuation Environment / policy settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvacuationConfig {
    /// Observation vector length (zero-padded or truncated).
    pub observation_width: usize,
    /// Hidden width of the actor-critic network.
    pub hidden_dim: usize,
    /// Episode horizon.
    pub max_steps: u32,
    /// Hard cap on people moved by a single step.
    pub per_step_cap: u32,
    pub params_path: Option<PathBuf>,
    pub seed: u64,
}

impl Default for EvacuationConfig {
    fn default() -> Self {
        Self {
            observation_width: 64,
            hidden_dim:        128,
            max_steps:         100,
            per_step_cap:      500,
            params_path:       None,
            seed:              42,
        }
    }
}

/// Rainfall scenario driver settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub time_step_minutes: u32,
    pub max_water_depth_m: f64,
    /// Rainfall the drainage network removes before water accumulates.
    /// Used by the quick runoff assessment.
    pub drainage_capacity_mm_per_hour: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            time_step_minutes:             15,
            max_water_depth_m:             3.0,
            drainage_capacity_mm_per_hour: 150.0,
        }
    }
}

/// Log output settings consumed by [`crate::telemetry::init_tracing`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string(), json: false }
    }
}
