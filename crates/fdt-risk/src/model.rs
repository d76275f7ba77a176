//! Forward pass of the risk network.
//!
//! Hidden state is a flat row-major buffer (`node_count × hidden`).  Each
//! round writes a fresh buffer from the previous one, so nodes never observe
//! a partially-updated round.

use fdt_core::NodeIdx;
use fdt_graph::{Adjacency, FEATURE_WIDTH};
use fdt_nn::{relu_in_place, sigmoid};

use crate::{GcnParams, GcnRound};

/// Score every node.  Returns one value in `[0, 100]` per feature row.
///
/// `adjacency` must cover the same node count as `features`; predecessors
/// outside the feature range are ignored.  `params` must already have
/// passed validation; [`RiskEngine`](crate::RiskEngine) guarantees this.
pub(crate) fn forward(params: &GcnParams, features: &[[f32; FEATURE_WIDTH]], adjacency: &Adjacency) -> Vec<f64> {
    #[cfg(not(feature = "parallel"))]
    let round_fn: RoundFn = run_round_sequential;
    #[cfg(feature = "parallel")]
    let round_fn: RoundFn = run_round_parallel;

    forward_with(params, features, adjacency, round_fn)
}

/// One message-passing round: reads `prev`, writes every row of `next`.
pub(crate) type RoundFn = fn(&GcnRound, &[f32], &mut [f32], usize, &Adjacency);

pub(crate) fn forward_with(
    params:    &GcnParams,
    features:  &[[f32; FEATURE_WIDTH]],
    adjacency: &Adjacency,
    round_fn:  RoundFn,
) -> Vec<f64> {
    let n = features.len();
    let hidden = params.hidden_channels();
    if n == 0 || hidden == 0 {
        return vec![0.0; n];
    }

    // ── Input projection ──────────────────────────────────────────────────
    let mut h = vec![0.0f32; n * hidden];
    for (row, x) in h.chunks_mut(hidden).zip(features) {
        params.input_proj.forward_into(x, row);
        relu_in_place(row);
    }

    // ── Message-passing rounds ────────────────────────────────────────────
    let mut next = vec![0.0f32; n * hidden];
    for round in &params.rounds {
        round_fn(round, &h, &mut next, hidden, adjacency);
        std::mem::swap(&mut h, &mut next);
    }

    // ── Output head ───────────────────────────────────────────────────────
    let mut mid = vec![0.0f32; params.head_hidden.out_dim];
    let mut out = [0.0f32; 1];
    h.chunks(hidden)
        .map(|row| {
            params.head_hidden.forward_into(row, &mut mid);
            relu_in_place(&mut mid);
            params.head_out.forward_into(&mid, &mut out);
            let score = f64::from(sigmoid(out[0])) * 100.0;
            if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 }
        })
        .collect()
}

/// Per-node update shared by both schedules.  `agg` and `t` are scratch
/// rows of width `hidden`.
#[allow(clippy::too_many_arguments)]
fn update_node(
    round:     &GcnRound,
    prev:      &[f32],
    hidden:    usize,
    adjacency: &Adjacency,
    v:         usize,
    out:       &mut [f32],
    agg:       &mut [f32],
    t:         &mut [f32],
) {
    let node_count = prev.len() / hidden;
    let own = &prev[v * hidden..(v + 1) * hidden];
    let preds = adjacency.predecessors(NodeIdx(v as u32));
    if preds.is_empty() {
        out.copy_from_slice(own);
        return;
    }

    agg.iter_mut().for_each(|a| *a = 0.0);
    for &u in preds.iter().filter(|u| u.index() < node_count) {
        let src = &prev[u.index() * hidden..(u.index() + 1) * hidden];
        for (a, s) in agg.iter_mut().zip(src) {
            *a += s;
        }
    }

    round.transform.forward_into(agg, t);
    round.norm.forward_in_place(t);
    relu_in_place(t);
    for ((o, t), h) in out.iter_mut().zip(t.iter()).zip(own) {
        *o = t + h;
    }
}

#[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
pub(crate) fn run_round_sequential(
    round:     &GcnRound,
    prev:      &[f32],
    next:      &mut [f32],
    hidden:    usize,
    adjacency: &Adjacency,
) {
    let mut agg = vec![0.0f32; hidden];
    let mut t = vec![0.0f32; hidden];
    for (v, out) in next.chunks_mut(hidden).enumerate() {
        update_node(round, prev, hidden, adjacency, v, out, &mut agg, &mut t);
    }
}

#[cfg(feature = "parallel")]
pub(crate) fn run_round_parallel(
    round:     &GcnRound,
    prev:      &[f32],
    next:      &mut [f32],
    hidden:    usize,
    adjacency: &Adjacency,
) {
    use rayon::prelude::*;

    next.par_chunks_mut(hidden).enumerate().for_each_init(
        || (vec![0.0f32; hidden], vec![0.0f32; hidden]),
        |(agg, t), (v, out)| update_node(round, prev, hidden, adjacency, v, out, agg, t),
    );
}
