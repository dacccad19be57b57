//! Unit tests for scoring over every signal combination

use stockwatch::config::SignalWeights;
use stockwatch::models::{SignalKind, SignalSet};
use stockwatch::signals::{Scorer, MAX_SCORE};

fn subset(mask: u32) -> SignalSet {
    SignalKind::ALL
        .iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, kind)| (*kind, kind.to_string()))
        .collect()
}

fn check_all_subsets(weights: SignalWeights) {
    let scorer = Scorer::new(weights.clone());
    for mask in 0..(1u32 << SignalKind::ALL.len()) {
        let signals = subset(mask);
        let expected = signals.keys().map(|k| weights.get(*k)).sum::<u32>().min(100);
        let score = scorer.score(&signals);
        assert_eq!(score, expected, "mask {mask:#010b}");
        assert!(score <= MAX_SCORE);
    }
}

#[test]
fn test_default_weights_match_capped_sum() {
    check_all_subsets(SignalWeights::default());
}

#[test]
fn test_custom_weights_match_capped_sum() {
    let weights = SignalWeights::default()
        .with(SignalKind::Uptrend, 60)
        .with(SignalKind::HighVolume, 0)
        .with(SignalKind::RsiOversold, 45);
    check_all_subsets(weights);
}

#[test]
fn test_every_signal_together_is_capped() {
    let everything = subset(0xFF);
    assert_eq!(Scorer::default().score(&everything), 100);
}
