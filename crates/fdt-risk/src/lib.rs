//! `fdt-risk` — the Risk Propagation Engine.
//!
//! Scores every node of an [`InfrastructureGraph`](fdt_graph::InfrastructureGraph)
//! with a fixed-parameter graph convolution and projects a simple hourly
//! cascade of flooding events.
//!
//! # Propagation
//!
//! ```text
//! features ─▶ input projection ─▶ ReLU ─▶ h₀
//! for round in 0..R:
//!     aggᵥ = Σ h[u]  for u ∈ predecessors(v)
//!     h'ᵥ  = ReLU(LayerNorm(W·aggᵥ + b)) + hᵥ     (in-degree 0: h'ᵥ = hᵥ)
//! h ─▶ Linear ─▶ ReLU ─▶ Linear ─▶ sigmoid ─▶ × 100
//! ```
//!
//! Round `k + 1` consumes the complete output of round `k`.  Within a round
//! every node reads only the previous buffer, so per-node work is
//! order-independent and may run in parallel.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`params`]   | `GcnParams` (serde), hydraulic prior, seeded init         |
//! | `model`      | forward pass over features + CSR adjacency (crate-private) |
//! | [`engine`]   | `RiskEngine` (`set_graph`, `propagate`, `score_graph`)    |
//! | [`result`]   | `RiskPropagationResult`, warnings, cascade timeline       |
//! | [`error`]    | `RiskError`, `RiskResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs per-node round work on Rayon's thread pool.        |

pub mod engine;
pub mod error;
mod model;
pub mod params;
pub mod result;


pub use engine::{ParamSource, RiskEngine};
pub use error::{RiskError, RiskResult};
pub use params::{GcnParams, GcnRound};
pub use result::{
    CascadeEvent, CriticalWarning, RiskPropagationResult, TimelineEntry, WarningLevel,
    simulate_cascade,
};
