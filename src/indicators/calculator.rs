//! Derives the full indicator snapshot from a bar series.

use crate::config::IndicatorPeriods;
use crate::indicators::momentum::{calculate_macd, calculate_rsi};
use crate::indicators::trend::{calculate_emas, calculate_smas};
use crate::indicators::volatility::calculate_bollinger_bands;
use crate::indicators::volume::calculate_volume_average;
use crate::models::{BarSeries, IndicatorSnapshot};

/// Longest default window; shorter histories still compute but leave `SMA_200` missing.
pub const RECOMMENDED_BARS: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct IndicatorCalculator {
    periods: IndicatorPeriods,
}

impl IndicatorCalculator {
    pub fn new(periods: IndicatorPeriods) -> Self {
        Self { periods }
    }

    /// Compute every indicator column. Returns `None` for an empty series.
    pub fn compute(&self, series: &BarSeries) -> Option<IndicatorSnapshot> {
        if series.is_empty() {
            return None;
        }
        let p = &self.periods;
        let closes = series.closes();
        let volumes = series.volumes();

        let mut smas = calculate_smas(series, &[p.sma_short, p.sma_medium, p.sma_long]).into_iter();
        let (sma_20, sma_50, sma_200) = (smas.next()?, smas.next()?, smas.next()?);

        let mut emas = calculate_emas(series, &[p.ema_fast, p.ema_slow]).into_iter();
        let (ema_12, ema_26) = (emas.next()?, emas.next()?);
        let macd = calculate_macd(&ema_12, &ema_26, p.macd_signal);
        let rsi = calculate_rsi(&closes, p.rsi);
        let bands = calculate_bollinger_bands(&closes, p.bb, p.bb_std_multiplier);
        let volume_avg_20 = calculate_volume_average(&volumes, p.volume_avg);

        Some(IndicatorSnapshot {
            dates: series.bars().iter().map(|b| b.date).collect(),
            close: closes,
            volume: volumes,
            sma_20,
            sma_50,
            sma_200,
            ema_12,
            ema_26,
            macd: macd.macd,
            macd_signal: macd.signal,
            rsi,
            bb_middle: bands.middle,
            bb_upper: bands.upper,
            bb_lower: bands.lower,
            volume_avg_20,
        })
    }
}
