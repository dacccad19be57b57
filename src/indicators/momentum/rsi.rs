//! RSI (Relative Strength Index) indicator

/// Calculate RSI for every row of `closes`
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss over the trailing `period` close-to-close changes
///
/// The first change needs two closes, so the first `period` rows are missing.
/// Only real close-to-close changes enter a window; the first value is one row
/// later than a rolling mean that zero-fills the undefined first change.
/// A window without any losses reads 100; one without gains reads 0.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    // changes[k] is the move into row k + 1
    for row in period..closes.len() {
        let window = row - period..row;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        out[row] = Some(rsi_from_averages(avg_gain, avg_loss));
    }
    out
}

/// RSI from average gain and loss.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
