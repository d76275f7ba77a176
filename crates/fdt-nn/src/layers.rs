//! Dense layers over flat row-major `f32` buffers.

use serde::{Deserialize, Serialize};

use fdt_core::SimRng;

use crate::{NnError, NnResult};

// ── Linear ────────────────────────────────────────────────────────────────────

/// Affine map `y = W x + b` with `W` stored row-major (`out_dim × in_dim`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    pub in_dim:  usize,
    pub out_dim: usize,
    /// Row `r` occupies `weight[r * in_dim .. (r + 1) * in_dim]`.
    pub weight:  Vec<f32>,
    pub bias:    Vec<f32>,
}

impl Linear {
    pub fn zeros(in_dim: usize, out_dim: usize) -> Self {
        Self {
            in_dim,
            out_dim,
            weight: vec![0.0; in_dim * out_dim],
            bias:   vec![0.0; out_dim],
        }
    }

    /// Xavier/Glorot-uniform weights, zero bias.
    pub fn xavier(in_dim: usize, out_dim: usize, rng: &mut SimRng) -> Self {
        let bound = (6.0 / (in_dim + out_dim).max(1) as f32).sqrt();
        let weight = (0..in_dim * out_dim)
            .map(|_| rng.gen_range(-bound..=bound))
            .collect();
        Self { in_dim, out_dim, weight, bias: vec![0.0; out_dim] }
    }

    /// `out_dim × out_dim` identity scaled by `gain`.
    pub fn scaled_identity(dim: usize, gain: f32) -> Self {
        let mut l = Self::zeros(dim, dim);
        for i in 0..dim {
            l.weight[i * dim + i] = gain;
        }
        l
    }

    #[inline]
    pub fn set_weight(&mut self, row: usize, col: usize, value: f32) {
        self.weight[row * self.in_dim + col] = value;
    }

    /// Check the buffers agree with the declared dimensions.
    pub fn validate(&self, layer: &str) -> NnResult<()> {
        if self.weight.len() != self.in_dim * self.out_dim {
            return Err(NnError::Shape {
                layer:    format!("{layer}.weight"),
                expected: self.in_dim * self.out_dim,
                got:      self.weight.len(),
            });
        }
        if self.bias.len() != self.out_dim {
            return Err(NnError::Shape {
                layer:    format!("{layer}.bias"),
                expected: self.out_dim,
                got:      self.bias.len(),
            });
        }
        Ok(())
    }

    /// Check that this layer can consume the output of a layer producing
    /// `upstream_dim` values.
    pub fn expect_input(&self, layer: &str, upstream_dim: usize) -> NnResult<()> {
        if self.in_dim != upstream_dim {
            return Err(NnError::Shape {
                layer:    format!("{layer}.in_dim"),
                expected: upstream_dim,
                got:      self.in_dim,
            });
        }
        Ok(())
    }

    /// Compute `W x + b` into `out`.
    ///
    /// `x` shorter than `in_dim` is treated as zero-padded; extra trailing
    /// values are ignored.
    pub fn forward_into(&self, x: &[f32], out: &mut [f32]) {
        let n = x.len().min(self.in_dim);
        for (r, o) in out.iter_mut().enumerate().take(self.out_dim) {
            let row = &self.weight[r * self.in_dim..r * self.in_dim + n];
            *o = self.bias[r] + row.iter().zip(&x[..n]).map(|(w, v)| w * v).sum::<f32>();
        }
    }

    pub fn forward(&self, x: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; self.out_dim];
        self.forward_into(x, &mut out);
        out
    }
}

// ── LayerNorm ─────────────────────────────────────────────────────────────────

/// Per-vector normalisation followed by an elementwise affine (`gamma`,
/// `beta`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerNorm {
    pub dim:   usize,
    pub gamma: Vec<f32>,
    pub beta:  Vec<f32>,
    pub eps:   f32,
}

impl LayerNorm {
    pub const DEFAULT_EPS: f32 = 1e-5;

    /// Unit gain, zero shift.
    pub fn identity(dim: usize) -> Self {
        Self::with_gain(dim, 1.0)
    }

    pub fn with_gain(dim: usize, gain: f32) -> Self {
        Self {
            dim,
            gamma: vec![gain; dim],
            beta:  vec![0.0; dim],
            eps:   Self::DEFAULT_EPS,
        }
    }

    pub fn validate(&self, layer: &str) -> NnResult<()> {
        for (what, len) in [("gamma", self.gamma.len()), ("beta", self.beta.len())] {
            if len != self.dim {
                return Err(NnError::Shape {
                    layer:    format!("{layer}.{what}"),
                    expected: self.dim,
                    got:      len,
                });
            }
        }
        Ok(())
    }

    pub fn forward_in_place(&self, x: &mut [f32]) {
        let n = x.len().min(self.dim);
        if n == 0 {
            return;
        }
        let x = &mut x[..n];
        let mean = x.iter().sum::<f32>() / n as f32;
        let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n as f32;
        let inv_std = 1.0 / (var + self.eps).sqrt();
        for (i, v) in x.iter_mut().enumerate() {
            *v = (*v - mean) * inv_std * self.gamma[i] + self.beta[i];
        }
    }
}
