//! Seeded RNG shared by every stochastic path in the workspace.
//!
//! Degraded-mode parameter initialisation, sampled rollouts and test
//! fixtures all draw from [`SimRng`].  Risk scoring never does.

use rand::rngs::SmallRng;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::{Rng, SeedableRng};

/// Reproducible random stream.  One seed, one sequence.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen()
    }

    /// Index drawn in proportion to `weights`.
    ///
    /// Negative and non-finite weights count as zero.  `None` when nothing
    /// positive remains.
    pub fn sample_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let usable = |w: f32| if w.is_finite() && w > 0.0 { f64::from(w) } else { 0.0 };
        let total: f64 = weights.iter().map(|&w| usable(w)).sum();
        if total <= 0.0 {
            return None;
        }

        let mut remaining = self.unit() * total;
        let mut chosen = None;
        for (i, &w) in weights.iter().enumerate() {
            let w = usable(w);
            if w == 0.0 {
                continue;
            }
            chosen = Some(i);
            if remaining < w {
                break;
            }
            remaining -= w;
        }
        chosen
    }
}
