//! Scenario tests for the analysis engine

use stockwatch::config::{Config, SignalLevels};
use stockwatch::models::{IndicatorRow, SignalKind};
use stockwatch::signals::{SignalEngine, SignalGenerator};

use crate::support::{linear, series};

fn engine() -> SignalEngine {
    SignalEngine::from_config(&Config::default())
}

#[test]
fn test_steady_uptrend_scores_uptrend_only() {
    let closes = linear(252, 100.0, 200.0);
    let result = engine().evaluate(&series("RISING", &closes, 5_000.0)).unwrap();

    assert!(result.has_signal(SignalKind::Uptrend));
    assert!(!result.has_signal(SignalKind::RsiOversold));
    assert!(!result.has_signal(SignalKind::MaCrossover));
    assert!(!result.has_signal(SignalKind::HighVolume));
    assert!(result.score >= 15);
    assert_eq!(result.rsi, Some(100.0));
    assert!((result.price - 200.0).abs() < 1e-9);
    assert!(result.sma_200.is_some());
}

#[test]
fn test_steady_decline_is_oversold() {
    let closes = linear(60, 200.0, 140.0);
    let result = engine().evaluate(&series("FALLING", &closes, 5_000.0)).unwrap();

    assert_eq!(result.rsi, Some(0.0));
    assert!(result.has_signal(SignalKind::RsiOversold));
    assert!(!result.has_signal(SignalKind::Uptrend));
    assert!(result.score >= 25);
}

#[test]
fn test_volume_spike_on_last_bar() {
    let closes = linear(30, 100.0, 110.0);
    let mut bars = crate::support::bars_from_closes(&closes, 1_000.0);
    bars.last_mut().unwrap().volume = 10_000.0;
    let series = stockwatch::models::BarSeries::new("SPIKE", bars).unwrap();

    let result = engine().evaluate(&series).unwrap();
    assert_eq!(
        result.signals.get(&SignalKind::HighVolume).map(String::as_str),
        Some("Volume spike > 1.5x average")
    );
}

#[test]
fn test_short_history_fails_closed() {
    let result = engine().evaluate(&series("NEW", &[101.0], 1_000.0)).unwrap();
    assert!(result.signals.is_empty());
    assert_eq!(result.score, 0);
    assert_eq!(result.sma_20, None);
}

#[test]
fn test_single_pass_is_idempotent() {
    let closes: Vec<f64> = (0..252)
        .map(|i| 100.0 + (i as f64 / 7.0).sin() * 8.0 + i as f64 * 0.1)
        .collect();
    let input = series("WAVE", &closes, 2_500.0);
    let first = engine().evaluate(&input).unwrap();
    let second = engine().evaluate(&input).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

fn row(sma_20: f64, sma_50: f64) -> IndicatorRow {
    IndicatorRow {
        date: chrono::NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        close: 100.0,
        volume: 1_000.0,
        sma_20: Some(sma_20),
        sma_50: Some(sma_50),
        sma_200: None,
        ema_12: None,
        ema_26: None,
        macd: None,
        macd_signal: None,
        rsi: None,
        bb_middle: None,
        bb_upper: None,
        bb_lower: None,
        volume_avg_20: None,
    }
}

#[test]
fn test_crossover_fires_only_on_the_transition() {
    let generator = SignalGenerator::new(SignalLevels::default());

    let crossed = generator.evaluate(&row(99.0, 100.0), &row(101.0, 100.0));
    assert!(crossed.contains_key(&SignalKind::MaCrossover));

    let touching = generator.evaluate(&row(100.0, 100.0), &row(100.5, 100.0));
    assert!(touching.contains_key(&SignalKind::MaCrossover));

    let already_above = generator.evaluate(&row(101.0, 100.0), &row(102.0, 100.0));
    assert!(!already_above.contains_key(&SignalKind::MaCrossover));
}

#[test]
fn test_missing_inputs_never_fire() {
    let generator = SignalGenerator::default();
    let mut previous = row(99.0, 100.0);
    previous.sma_50 = None;
    let signals = generator.evaluate(&previous, &row(101.0, 100.0));
    assert!(signals.is_empty());
}
