//! Random source for weighted trait selection

use crate::catalog::FlatTable;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Random selector for proportional choices
///
/// Production runs seed from the operating system; tests and `--seed`
/// runs use a fixed seed so draws are reproducible.
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a selector seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Generic weighted random selection
    ///
    /// Returns an index into `weights` using the cumulative distribution, or
    /// `None` when the weights do not sum to a positive number.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return None;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            // Zero weights never win, even when the draw lands exactly on a boundary
            if weight <= 0.0 {
                continue;
            }
            rand_val -= weight;
            if rand_val <= 0.0 {
                return Some(i);
            }
        }
        weights.iter().rposition(|&weight| weight > 0.0)
    }

    /// Draw one value from a flat table with probability proportional to weight
    pub fn choose<'t>(&mut self, table: &'t FlatTable) -> Option<&'t str> {
        let index = self.weighted_choice(&table.weights())?;
        table.value_at(index)
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::from_os_rng()
    }
}
