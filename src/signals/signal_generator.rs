use crate::config::SignalLevels;
use crate::indicators::trend::crossed_above;
use crate::indicators::volume::is_volume_spike;
use crate::models::{IndicatorRow, IndicatorSnapshot, SignalKind, SignalSet};

/// Derives bullish signals from the two most recent snapshot rows.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    levels: SignalLevels,
}

impl SignalGenerator {
    pub fn new(levels: SignalLevels) -> Self {
        Self { levels }
    }

    /// Evaluate every rule on (previous, current). Fewer than two rows gives
    /// an empty set; a rule whose inputs are still warming up never fires.
    pub fn generate_signals(&self, snapshot: &IndicatorSnapshot) -> SignalSet {
        match snapshot.trailing_pair() {
            Some((previous, current)) => self.evaluate(&previous, &current),
            None => SignalSet::new(),
        }
    }

    pub fn evaluate(&self, previous: &IndicatorRow, current: &IndicatorRow) -> SignalSet {
        let mut signals = SignalSet::new();

        if crossed_above(current.sma_20, current.sma_50, previous.sma_20, previous.sma_50) {
            signals.insert(
                SignalKind::MaCrossover,
                "Golden Cross: 20 SMA > 50 SMA".to_string(),
            );
        }

        if crossed_above(current.ema_12, current.ema_26, previous.ema_12, previous.ema_26) {
            signals.insert(
                SignalKind::EmaCrossover,
                "EMA Golden Cross: 12 EMA > 26 EMA".to_string(),
            );
        }

        if crossed_above(
            current.macd,
            current.macd_signal,
            previous.macd,
            previous.macd_signal,
        ) {
            signals.insert(
                SignalKind::MacdBullish,
                "MACD crossed above signal".to_string(),
            );
        }

        if crossed_above(current.macd, Some(0.0), previous.macd, Some(0.0)) {
            signals.insert(SignalKind::MacdPositive, "MACD turned positive".to_string());
        }

        if let Some(rsi) = current.rsi.filter(|rsi| *rsi <= self.levels.rsi_oversold) {
            signals.insert(SignalKind::RsiOversold, format!("RSI Oversold ({rsi:.2})"));
        }

        if current.bb_lower.is_some_and(|lower| current.close < lower) {
            signals.insert(
                SignalKind::BbOversold,
                "Price below lower Bollinger Band".to_string(),
            );
        }

        let multiplier = self.levels.volume_spike_multiplier;
        if is_volume_spike(current.volume, current.volume_avg_20, multiplier) {
            signals.insert(
                SignalKind::HighVolume,
                format!("Volume spike > {multiplier}x average"),
            );
        }

        let above_long_average = current.sma_200.is_some_and(|sma| current.close > sma);
        let short_above_medium = matches!(
            (current.sma_20, current.sma_50),
            (Some(short), Some(medium)) if short > medium
        );
        if above_long_average && short_above_medium {
            signals.insert(SignalKind::Uptrend, "Long-term uptrend in place".to_string());
        }

        signals
    }
}
