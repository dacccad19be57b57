//! Market data provider interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{BarSeries, IndexQuote, SeriesError};

#[derive(Debug, Error)]
pub enum FetchError {
    /// The source answered but has no bars for the symbol.
    #[error("no data for symbol {0}")]
    NoData(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl FetchError {
    /// Worth retrying within the same fetch: network faults, throttling and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::NoData(_) | FetchError::Decode(_) | FetchError::Series(_) => false,
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `symbol` covering `lookback` (e.g. `"1y"`), oldest first.
    async fn fetch_daily_bars(&self, symbol: &str, lookback: &str)
        -> Result<BarSeries, FetchError>;

    /// Current level of `symbol` and the previous session close.
    async fn fetch_quote(&self, symbol: &str) -> Result<IndexQuote, FetchError>;
}
