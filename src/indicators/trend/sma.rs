//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::models::BarSeries;

/// Trailing SMA of closes, missing for the first `period - 1` rows.
pub fn calculate_sma(series: &BarSeries, period: usize) -> Vec<Option<f64>> {
    math::sma_series(&series.closes(), period)
}

/// Calculate several SMAs at once, in the order of `periods`
pub fn calculate_smas(series: &BarSeries, periods: &[usize]) -> Vec<Vec<Option<f64>>> {
    let closes = series.closes();
    periods
        .iter()
        .map(|&period| math::sma_series(&closes, period))
        .collect()
}

/// True when `fast` crossed above `slow` between the previous and current row.
///
/// Missing values on either row mean no crossover.
pub fn crossed_above(
    fast_now: Option<f64>,
    slow_now: Option<f64>,
    fast_prev: Option<f64>,
    slow_prev: Option<f64>,
) -> bool {
    match (fast_now, slow_now, fast_prev, slow_prev) {
        (Some(fn_), Some(sn), Some(fp), Some(sp)) => fn_ > sn && fp <= sp,
        _ => false,
    }
}
