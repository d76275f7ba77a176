//! Action-probability functions.
//!
//! A [`Policy`] is a pure function from an observation to one probability
//! per action.  The vector need not match the environment's action count:
//! consumers treat missing entries as probability 0 and ignore extras.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fdt_core::{EvacuationConfig, SimRng};
use fdt_nn::{Linear, NnError, NnResult, ParamSet, load_params, relu_in_place, softmax};

use crate::EvacResult;

/// Maps observations to action probabilities.
///
/// `Send + Sync` so one trained policy can serve concurrent planning
/// requests.
pub trait Policy: Send + Sync {
    fn action_probabilities(&self, observation: &[f32]) -> Vec<f32>;
}

impl<F> Policy for F
where
    F: Fn(&[f32]) -> Vec<f32> + Send + Sync,
{
    fn action_probabilities(&self, observation: &[f32]) -> Vec<f32> {
        self(observation)
    }
}

// ── UniformPolicy ─────────────────────────────────────────────────────────────

/// Equal probability over a fixed number of actions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformPolicy {
    pub actions: usize,
}

impl Policy for UniformPolicy {
    fn action_probabilities(&self, _observation: &[f32]) -> Vec<f32> {
        vec![1.0 / self.actions.max(1) as f32; self.actions]
    }
}

// ── ActorCritic ───────────────────────────────────────────────────────────────

/// Shared trunk with separate policy (actor) and value (critic) heads.
///
/// ```text
/// obs ─▶ Linear ─▶ ReLU ─▶ Linear ─▶ ReLU ─┬▶ Linear ─▶ ReLU ─▶ Linear ─▶ logits
///                                          └▶ Linear ─▶ ReLU ─▶ Linear ─▶ value
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorCriticParams {
    pub shared_in:     Linear,
    pub shared_hidden: Linear,
    pub actor_hidden:  Linear,
    pub actor_out:     Linear,
    pub critic_hidden: Linear,
    pub critic_out:    Linear,
}

impl ActorCriticParams {
    /// Xavier-uniform weights drawn from `seed`.
    pub fn seeded(state_dim: usize, hidden_dim: usize, num_actions: usize, seed: u64) -> Self {
        let half = (hidden_dim / 2).max(1);
        let mut rng = SimRng::new(seed);
        Self {
            shared_in:     Linear::xavier(state_dim, hidden_dim, &mut rng),
            shared_hidden: Linear::xavier(hidden_dim, hidden_dim, &mut rng),
            actor_hidden:  Linear::xavier(hidden_dim, half, &mut rng),
            actor_out:     Linear::xavier(half, num_actions, &mut rng),
            critic_hidden: Linear::xavier(hidden_dim, half, &mut rng),
            critic_out:    Linear::xavier(half, 1, &mut rng),
        }
    }

    pub fn state_dim(&self) -> usize {
        self.shared_in.in_dim
    }

    pub fn num_actions(&self) -> usize {
        self.actor_out.out_dim
    }
}

impl ParamSet for ActorCriticParams {
    fn validate(&self) -> NnResult<()> {
        let layers = [
            ("shared_in", &self.shared_in),
            ("shared_hidden", &self.shared_hidden),
            ("actor_hidden", &self.actor_hidden),
            ("actor_out", &self.actor_out),
            ("critic_hidden", &self.critic_hidden),
            ("critic_out", &self.critic_out),
        ];
        for (name, layer) in layers {
            layer.validate(name)?;
        }
        self.shared_hidden.expect_input("shared_hidden", self.shared_in.out_dim)?;
        self.actor_hidden.expect_input("actor_hidden", self.shared_hidden.out_dim)?;
        self.actor_out.expect_input("actor_out", self.actor_hidden.out_dim)?;
        self.critic_hidden.expect_input("critic_hidden", self.shared_hidden.out_dim)?;
        self.critic_out.expect_input("critic_out", self.critic_hidden.out_dim)?;
        if self.critic_out.out_dim != 1 {
            return Err(NnError::Shape {
                layer:    "critic_out.out_dim".to_string(),
                expected: 1,
                got:      self.critic_out.out_dim,
            });
        }
        Ok(())
    }
}

/// Fixed-parameter actor-critic network.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorCritic {
    params: ActorCriticParams,
}

impl ActorCritic {
    pub fn new(params: ActorCriticParams) -> EvacResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Load `path`, validated.
    pub fn load(path: &Path) -> EvacResult<Self> {
        Ok(Self { params: load_params(path)? })
    }

    /// Network sized by `cfg` with `num_actions` outputs.  Loads
    /// `cfg.params_path` when set.  A file that fails to load, or whose input
    /// width or action count differs from `cfg.observation_width` /
    /// `num_actions`, is logged and replaced by seeded initialisation.
    pub fn from_config(cfg: &EvacuationConfig, num_actions: usize) -> Self {
        if let Some(path) = &cfg.params_path {
            match Self::load(path) {
                Ok(net)
                    if net.params.state_dim() == cfg.observation_width
                        && net.params.num_actions() == num_actions =>
                {
                    info!(path = %path.display(), actions = num_actions, "loaded evacuation policy");
                    return net;
                }
                Ok(net) => {
                    warn!(
                        path = %path.display(),
                        file_state_dim = net.params.state_dim(),
                        file_actions = net.params.num_actions(),
                        state_dim = cfg.observation_width,
                        actions = num_actions,
                        "evacuation policy does not fit this scenario; using seeded weights"
                    );
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "evacuation policy unavailable; using seeded weights");
                }
            }
        }
        Self {
            params: ActorCriticParams::seeded(cfg.observation_width, cfg.hidden_dim, num_actions, cfg.seed),
        }
    }

    pub fn params(&self) -> &ActorCriticParams {
        &self.params
    }

    fn trunk(&self, observation: &[f32]) -> Vec<f32> {
        let mut h = self.params.shared_in.forward(observation);
        relu_in_place(&mut h);
        let mut h = self.params.shared_hidden.forward(&h);
        relu_in_place(&mut h);
        h
    }

    /// Unnormalised action scores.
    pub fn logits(&self, observation: &[f32]) -> Vec<f32> {
        let h = self.trunk(observation);
        let mut a = self.params.actor_hidden.forward(&h);
        relu_in_place(&mut a);
        self.params.actor_out.forward(&a)
    }

    /// Critic estimate of the state value.
    pub fn value(&self, observation: &[f32]) -> f32 {
        let h = self.trunk(observation);
        let mut c = self.params.critic_hidden.forward(&h);
        relu_in_place(&mut c);
        self.params.critic_out.forward(&c)[0]
    }
}

impl Policy for ActorCritic {
    fn action_probabilities(&self, observation: &[f32]) -> Vec<f32> {
        softmax(&self.logits(observation))
    }
}
