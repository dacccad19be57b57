//! Composite score from a signal set.

use crate::config::SignalWeights;
use crate::models::SignalSet;

/// Upper bound of every score.
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: SignalWeights,
}

impl Scorer {
    pub fn new(weights: SignalWeights) -> Self {
        Self { weights }
    }

    /// Sum of the present signals' weights, capped at [`MAX_SCORE`].
    pub fn score(&self, signals: &SignalSet) -> u32 {
        let total = signals
            .keys()
            .fold(0u32, |acc, kind| acc.saturating_add(self.weights.get(*kind)));
        total.min(MAX_SCORE)
    }
}
