//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::BarSeries;

/// EMA of closes for the given span.
///
/// Seeded with the first close, so every row of a non-empty series has a value.
pub fn calculate_ema(series: &BarSeries, span: usize) -> Vec<Option<f64>> {
    math::ema_series(&series.closes(), span)
        .into_iter()
        .map(Some)
        .collect()
}

/// Calculate multiple EMAs at once
pub fn calculate_emas(series: &BarSeries, spans: &[usize]) -> Vec<Vec<Option<f64>>> {
    spans.iter().map(|&span| calculate_ema(series, span)).collect()
}
