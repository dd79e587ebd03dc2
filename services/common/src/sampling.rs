//! Weighted-coin sampling

use crate::errors::StatsError;
use rand::Rng;

/// A Bernoulli draw with a fixed success probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedCoin {
    probability: f64,
}

impl WeightedCoin {
    /// Create a coin that lands `true` with the given probability.
    ///
    /// Probabilities outside `[0, 1]` are rejected at construction.
    pub fn new(probability: f64) -> Result<Self, StatsError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(StatsError::Configuration(format!(
                "coin probability must be within [0, 1], got {probability}"
            )));
        }
        Ok(Self { probability })
    }

    /// Success probability of this coin
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// Draw once from the given rng
    pub fn flip<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_range(0.0..1.0) < self.probability
    }
}
