use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the derived indicator columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorName {
    #[serde(rename = "SMA_20")]
    Sma20,
    #[serde(rename = "SMA_50")]
    Sma50,
    #[serde(rename = "SMA_200")]
    Sma200,
    #[serde(rename = "EMA_12")]
    Ema12,
    #[serde(rename = "EMA_26")]
    Ema26,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "MACD_Signal")]
    MacdSignal,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "BB_Middle")]
    BbMiddle,
    #[serde(rename = "BB_Upper")]
    BbUpper,
    #[serde(rename = "BB_Lower")]
    BbLower,
    #[serde(rename = "Volume_Avg20")]
    VolumeAvg20,
}

impl IndicatorName {
    pub const ALL: [IndicatorName; 12] = [
        IndicatorName::Sma20,
        IndicatorName::Sma50,
        IndicatorName::Sma200,
        IndicatorName::Ema12,
        IndicatorName::Ema26,
        IndicatorName::Macd,
        IndicatorName::MacdSignal,
        IndicatorName::Rsi,
        IndicatorName::BbMiddle,
        IndicatorName::BbUpper,
        IndicatorName::BbLower,
        IndicatorName::VolumeAvg20,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorName::Sma20 => "SMA_20",
            IndicatorName::Sma50 => "SMA_50",
            IndicatorName::Sma200 => "SMA_200",
            IndicatorName::Ema12 => "EMA_12",
            IndicatorName::Ema26 => "EMA_26",
            IndicatorName::Macd => "MACD",
            IndicatorName::MacdSignal => "MACD_Signal",
            IndicatorName::Rsi => "RSI",
            IndicatorName::BbMiddle => "BB_Middle",
            IndicatorName::BbUpper => "BB_Upper",
            IndicatorName::BbLower => "BB_Lower",
            IndicatorName::VolumeAvg20 => "Volume_Avg20",
        }
    }
}

impl fmt::Display for IndicatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bar series extended with its indicator columns.
///
/// Every column is aligned index-for-index with `dates`. `None` marks a row
/// inside an indicator's warm-up window and is never read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub sma_20: Vec<Option<f64>>,
    pub sma_50: Vec<Option<f64>>,
    pub sma_200: Vec<Option<f64>>,
    pub ema_12: Vec<Option<f64>>,
    pub ema_26: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub volume_avg_20: Vec<Option<f64>>,
}

impl IndicatorSnapshot {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, name: IndicatorName) -> &[Option<f64>] {
        match name {
            IndicatorName::Sma20 => &self.sma_20,
            IndicatorName::Sma50 => &self.sma_50,
            IndicatorName::Sma200 => &self.sma_200,
            IndicatorName::Ema12 => &self.ema_12,
            IndicatorName::Ema26 => &self.ema_26,
            IndicatorName::Macd => &self.macd,
            IndicatorName::MacdSignal => &self.macd_signal,
            IndicatorName::Rsi => &self.rsi,
            IndicatorName::BbMiddle => &self.bb_middle,
            IndicatorName::BbUpper => &self.bb_upper,
            IndicatorName::BbLower => &self.bb_lower,
            IndicatorName::VolumeAvg20 => &self.volume_avg_20,
        }
    }

    /// Value of one indicator on one row, `None` while warming up.
    pub fn value(&self, name: IndicatorName, index: usize) -> Option<f64> {
        self.column(name).get(index).copied().flatten()
    }

    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        if index >= self.len() {
            return None;
        }
        Some(IndicatorRow {
            date: self.dates[index],
            close: self.close[index],
            volume: self.volume[index],
            sma_20: self.value(IndicatorName::Sma20, index),
            sma_50: self.value(IndicatorName::Sma50, index),
            sma_200: self.value(IndicatorName::Sma200, index),
            ema_12: self.value(IndicatorName::Ema12, index),
            ema_26: self.value(IndicatorName::Ema26, index),
            macd: self.value(IndicatorName::Macd, index),
            macd_signal: self.value(IndicatorName::MacdSignal, index),
            rsi: self.value(IndicatorName::Rsi, index),
            bb_middle: self.value(IndicatorName::BbMiddle, index),
            bb_upper: self.value(IndicatorName::BbUpper, index),
            bb_lower: self.value(IndicatorName::BbLower, index),
            volume_avg_20: self.value(IndicatorName::VolumeAvg20, index),
        })
    }

    pub fn last_row(&self) -> Option<IndicatorRow> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// The (previous, current) pair of trailing rows, if at least two exist.
    pub fn trailing_pair(&self) -> Option<(IndicatorRow, IndicatorRow)> {
        let last = self.len().checked_sub(1)?;
        let previous = last.checked_sub(1)?;
        Some((self.row(previous)?, self.row(last)?))
    }
}

/// One row of an [`IndicatorSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub volume_avg_20: Option<f64>,
}
