//! Main signal evaluation engine: indicators, signals, score.

use crate::config::Config;
use crate::indicators::IndicatorCalculator;
use crate::models::{AnalysisResult, BarSeries, IndicatorSnapshot};
use crate::signals::scoring::Scorer;
use crate::signals::signal_generator::SignalGenerator;

/// Rows needed before crossover rules can fire.
pub const MIN_BARS: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    calculator: IndicatorCalculator,
    generator: SignalGenerator,
    scorer: Scorer,
}

impl SignalEngine {
    pub fn new(calculator: IndicatorCalculator, generator: SignalGenerator, scorer: Scorer) -> Self {
        Self {
            calculator,
            generator,
            scorer,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            IndicatorCalculator::new(config.periods),
            SignalGenerator::new(config.levels),
            Scorer::new(config.weights.clone()),
        )
    }

    /// Analyse one series. `None` only when the series is empty.
    pub fn evaluate(&self, series: &BarSeries) -> Option<AnalysisResult> {
        self.evaluate_with_indicators(series).map(|(result, _)| result)
    }

    /// Analyse and also return the full indicator snapshot (for debugging output).
    pub fn evaluate_with_indicators(
        &self,
        series: &BarSeries,
    ) -> Option<(AnalysisResult, IndicatorSnapshot)> {
        let snapshot = self.calculator.compute(series)?;
        let last = snapshot.last_row()?;
        let signals = self.generator.generate_signals(&snapshot);
        let score = self.scorer.score(&signals);

        let result = AnalysisResult {
            symbol: series.symbol().to_string(),
            date: last.date,
            price: last.close,
            score,
            signals,
            rsi: last.rsi,
            macd: last.macd,
            sma_20: last.sma_20,
            sma_50: last.sma_50,
            sma_200: last.sma_200,
            bb_lower: last.bb_lower,
        };
        Some((result, snapshot))
    }
}
