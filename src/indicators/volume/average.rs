//! Trailing average volume

use crate::common::math;

/// SMA of volume over the trailing `period` rows.
pub fn calculate_volume_average(volumes: &[f64], period: usize) -> Vec<Option<f64>> {
    math::sma_series(volumes, period)
}

/// True when `volume` exceeds `average * multiplier`; missing average means no spike.
pub fn is_volume_spike(volume: f64, average: Option<f64>, multiplier: f64) -> bool {
    average.is_some_and(|avg| volume > avg * multiplier)
}
