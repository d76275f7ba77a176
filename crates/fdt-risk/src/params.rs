//! Graph-convolution parameter set.
//!
//! Trained weights are loaded from JSON with [`fdt_nn::load_params`].  When
//! none are available the engine runs on one of two built-in sets:
//!
//! - [`GcnParams::prior`]: hand-set weights encoding a hydraulic prior:
//!   risk grows with standing water and population, falls with elevation,
//!   and rises further when upstream neighbours are flooded.
//! - [`GcnParams::seeded`]: Xavier-uniform initialisation from a seed.

use serde::{Deserialize, Serialize};

use fdt_core::SimRng;
use fdt_graph::FEATURE_WIDTH;
use fdt_nn::{LayerNorm, Linear, NnError, NnResult, ParamSet};

/// Hidden channels used by the prior.  Smaller requests are widened to this.
const PRIOR_MIN_HIDDEN: usize = 4;

// Prior hidden channels.
const HAZARD: usize = 0;
const EXPOSURE: usize = 1;
const CRITICALITY: usize = 2;

// Feature columns (see `fdt_graph::FEATURE_NAMES`).
const F_ELEVATION: usize = 0;
const F_HOSPITAL: usize = 2;
const F_POWER: usize = 4;
const F_DEPTH: usize = 6;
const F_POPULATION: usize = 7;

/// Summed upstream hazard above which a predecessor counts as flooded.
const PRIOR_FLOOD_HAZARD: f32 = 0.5;
/// Hazard added to a node per round when its upstream is flooded.
const PRIOR_SPREAD: f32 = 0.35;

/// One message-passing round: transform of the aggregated neighbourhood,
/// then normalisation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GcnRound {
    pub transform: Linear,
    pub norm:      LayerNorm,
}

/// Complete parameter set for the risk network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GcnParams {
    /// `FEATURE_WIDTH → hidden`.
    pub input_proj:  Linear,
    pub rounds:      Vec<GcnRound>,
    /// `hidden → hidden / 2`.
    pub head_hidden: Linear,
    /// `hidden / 2 → 1`.
    pub head_out:    Linear,
}

impl GcnParams {
    pub fn hidden_channels(&self) -> usize {
        self.input_proj.out_dim
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Deterministic hydraulic prior.
    ///
    /// Channel layout: 0 = hazard, 1 = exposure, 2 = criticality; the rest
    /// stay zero.  `hidden` is widened to at least 4.
    pub fn prior(hidden: usize, rounds: usize) -> Self {
        let hidden = hidden.max(PRIOR_MIN_HIDDEN);
        let mid = hidden / 2;

        let mut input_proj = Linear::zeros(FEATURE_WIDTH, hidden);
        input_proj.set_weight(HAZARD, F_DEPTH, 4.0);
        input_proj.set_weight(HAZARD, F_ELEVATION, -2.0);
        input_proj.bias[HAZARD] = 0.2;
        input_proj.set_weight(EXPOSURE, F_POPULATION, 1.0);
        input_proj.set_weight(CRITICALITY, F_HOSPITAL, 1.0);
        input_proj.set_weight(CRITICALITY, F_POWER, 1.0);

        // Only the hazard channel spreads.  After normalisation a single
        // non-zero channel has magnitude sqrt(hidden - 1); gamma rescales it
        // to PRIOR_SPREAD.
        let round = || {
            let mut transform = Linear::zeros(hidden, hidden);
            transform.set_weight(HAZARD, HAZARD, 1.0);
            transform.bias[HAZARD] = -PRIOR_FLOOD_HAZARD;
            let mut norm = LayerNorm::with_gain(hidden, 0.0);
            norm.gamma[HAZARD] = PRIOR_SPREAD / ((hidden - 1) as f32).sqrt();
            GcnRound { transform, norm }
        };

        let mut head_hidden = Linear::zeros(hidden, mid);
        head_hidden.set_weight(0, HAZARD, 2.0);
        head_hidden.set_weight(0, EXPOSURE, 0.5);
        head_hidden.set_weight(0, CRITICALITY, 0.5);

        let mut head_out = Linear::zeros(mid, 1);
        head_out.set_weight(0, 0, 1.0);
        head_out.bias[0] = -2.0;

        Self {
            input_proj,
            rounds: (0..rounds).map(|_| round()).collect(),
            head_hidden,
            head_out,
        }
    }

    /// Xavier-uniform weights drawn from `seed`.  Same seed, same weights.
    pub fn seeded(hidden: usize, rounds: usize, seed: u64) -> Self {
        let hidden = hidden.max(2);
        let mid = hidden / 2;
        let mut rng = SimRng::new(seed);
        let input_proj = Linear::xavier(FEATURE_WIDTH, hidden, &mut rng);
        let rounds = (0..rounds)
            .map(|_| GcnRound {
                transform: Linear::xavier(hidden, hidden, &mut rng),
                norm:      LayerNorm::identity(hidden),
            })
            .collect();
        let head_hidden = Linear::xavier(hidden, mid, &mut rng);
        let head_out = Linear::xavier(mid, 1, &mut rng);
        Self { input_proj, rounds, head_hidden, head_out }
    }
}

impl ParamSet for GcnParams {
    fn validate(&self) -> NnResult<()> {
        self.input_proj.validate("input_proj")?;
        self.input_proj.expect_input("input_proj", FEATURE_WIDTH)?;
        let hidden = self.input_proj.out_dim;

        for (i, r) in self.rounds.iter().enumerate() {
            let name = format!("rounds[{i}]");
            r.transform.validate(&name)?;
            r.transform.expect_input(&name, hidden)?;
            if r.transform.out_dim != hidden {
                return Err(NnError::Shape {
                    layer:    format!("{name}.out_dim"),
                    expected: hidden,
                    got:      r.transform.out_dim,
                });
            }
            r.norm.validate(&format!("{name}.norm"))?;
            if r.norm.dim != hidden {
                return Err(NnError::Shape {
                    layer:    format!("{name}.norm.dim"),
                    expected: hidden,
                    got:      r.norm.dim,
                });
            }
        }

        self.head_hidden.validate("head_hidden")?;
        self.head_hidden.expect_input("head_hidden", hidden)?;
        self.head_out.validate("head_out")?;
        self.head_out.expect_input("head_out", self.head_hidden.out_dim)?;
        if self.head_out.out_dim != 1 {
            return Err(NnError::Shape {
                layer:    "head_out.out_dim".to_string(),
                expected: 1,
                got:      self.head_out.out_dim,
            });
        }
        Ok(())
    }
}
