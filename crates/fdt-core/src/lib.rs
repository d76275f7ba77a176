//! `fdt-core` — foundational types for the `rust_fdt` flood digital twin.
//!
//! This crate is a dependency of every other `fdt-*` crate.  It has no
//! `fdt-*` dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeIdx`, `EdgeIdx`                                  |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`rng`]         | `SimRng` (seeded, the only randomness source)         |
//! | [`error`]       | `FdtError`, `ErrorKind`, `ErrorReport`, `Reportable`  |
//! | [`config`]      | `EngineConfig` and its TOML sections                  |
//! | [`telemetry`]   | `init_tracing` for binaries                           |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod telemetry;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    EngineConfig, EvacuationConfig, LoggingConfig, ParamFallback, RiskConfig, ScenarioConfig,
};
pub use error::{ErrorKind, ErrorReport, FdtError, FdtResult, Reportable};
pub use geo::GeoPoint;
pub use ids::{EdgeIdx, NodeIdx};
pub use rng::SimRng;

/// Flood observation: node or zone id → standing water depth in metres.
pub type DepthMap = std::collections::HashMap<String, f64>;
