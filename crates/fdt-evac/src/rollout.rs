//! Whole-episode rollout of a policy.

use serde::Serialize;
use tracing::debug;

use fdt_core::SimRng;

use crate::env::AT_RISK_DEPTH_M;
use crate::{ActionOutcome, EvacuationEnv, Policy};

/// How an action is drawn from the policy's distribution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionSelection {
    /// Sample proportionally to probability.
    Sample,
    /// Always take the most probable action (first on ties).
    Greedy,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub steps:              u32,
    pub total_reward:       f64,
    pub total_evacuated:    u64,
    pub casualties_avoided: u64,
    pub wasted_actions:     u32,
    /// `true` when every at-risk zone was emptied.
    pub completed:          bool,
}

/// Step `env` with `policy` until the episode ends.
///
/// The environment is used as is: call [`EvacuationEnv::reset`] and
/// [`EvacuationEnv::update_flood_state`] first.  Terminates within the
/// environment's step cap.  Probabilities beyond the action count are
/// ignored; an all-zero distribution falls back to action 0.
pub fn run_episode(
    env:    &mut EvacuationEnv,
    policy: &dyn Policy,
    mode:   ActionSelection,
    rng:    &mut SimRng,
) -> EpisodeSummary {
    let mut summary = EpisodeSummary::default();
    let mut observation = env.observation();
    let action_count = env.action_count().max(1);

    loop {
        let mut probs = policy.action_probabilities(&observation);
        probs.truncate(action_count);
        let action = match mode {
            ActionSelection::Sample => rng.sample_weighted(&probs),
            ActionSelection::Greedy => argmax(&probs),
        }
        .unwrap_or(0);

        let outcome = env.step(action);
        summary.steps += 1;
        summary.total_reward += outcome.reward;
        summary.total_evacuated += u64::from(outcome.info.evacuated);
        summary.casualties_avoided += u64::from(outcome.info.casualties_avoided);
        if outcome.info.outcome == ActionOutcome::Wasted {
            summary.wasted_actions += 1;
        }
        observation = outcome.observation;

        if outcome.done {
            summary.completed = env_emptied(env);
            break;
        }
    }

    debug!(
        steps = summary.steps,
        evacuated = summary.total_evacuated,
        reward = summary.total_reward,
        "evacuation episode finished"
    );
    summary
}

fn env_emptied(env: &EvacuationEnv) -> bool {
    env.zones().iter().enumerate().all(|(i, z)| {
        env.state().flood_depth[i] <= AT_RISK_DEPTH_M || env.state().evacuated[i] >= z.population
    })
}

fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() && v > 0.0 && best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
