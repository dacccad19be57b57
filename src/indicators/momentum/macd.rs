//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;

/// MACD line and its signal line, aligned with the input rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// Calculate MACD from the fast and slow EMA columns.
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal_span) of MACD, over the rows where MACD is defined
pub fn calculate_macd(
    ema_fast: &[Option<f64>],
    ema_slow: &[Option<f64>],
    signal_span: usize,
) -> MacdSeries {
    let macd = math::subtract(ema_fast, ema_slow);

    let mut signal = Vec::with_capacity(macd.len());
    let mut previous: Option<f64> = None;
    for value in &macd {
        let next = match (*value, previous) {
            (None, _) => None,
            (Some(v), None) => Some(v),
            (Some(v), Some(prev)) => Some(math::ema_from_previous(v, prev, signal_span)),
        };
        if next.is_some() {
            previous = next;
        }
        signal.push(next);
    }

    MacdSeries { macd, signal }
}
