//! Signal names, signal sets, and per-symbol analysis results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The fixed set of bullish technical signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "MA_Crossover")]
    MaCrossover,
    #[serde(rename = "EMA_Crossover")]
    EmaCrossover,
    #[serde(rename = "MACD_Bullish")]
    MacdBullish,
    #[serde(rename = "MACD_Positive")]
    MacdPositive,
    #[serde(rename = "RSI_Oversold")]
    RsiOversold,
    #[serde(rename = "BB_Oversold")]
    BbOversold,
    #[serde(rename = "High_Volume")]
    HighVolume,
    #[serde(rename = "Uptrend")]
    Uptrend,
}

impl SignalKind {
    pub const ALL: [SignalKind; 8] = [
        SignalKind::MaCrossover,
        SignalKind::EmaCrossover,
        SignalKind::MacdBullish,
        SignalKind::MacdPositive,
        SignalKind::RsiOversold,
        SignalKind::BbOversold,
        SignalKind::HighVolume,
        SignalKind::Uptrend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::MaCrossover => "MA_Crossover",
            SignalKind::EmaCrossover => "EMA_Crossover",
            SignalKind::MacdBullish => "MACD_Bullish",
            SignalKind::MacdPositive => "MACD_Positive",
            SignalKind::RsiOversold => "RSI_Oversold",
            SignalKind::BbOversold => "BB_Oversold",
            SignalKind::HighVolume => "High_Volume",
            SignalKind::Uptrend => "Uptrend",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown signal: {s}"))
    }
}

/// Active signals mapped to their human readable descriptions.
///
/// Ordered by kind so that rendering and serialisation are deterministic.
pub type SignalSet = BTreeMap<SignalKind, String>;

/// Outcome of analysing one symbol on one evaluation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub date: NaiveDate,
    pub price: f64,
    pub score: u32,
    pub signals: SignalSet,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub bb_lower: Option<f64>,
}

impl AnalysisResult {
    pub fn has_signal(&self, kind: SignalKind) -> bool {
        self.signals.contains_key(&kind)
    }
}
