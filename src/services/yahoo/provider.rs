//! Daily bars from the Yahoo Finance chart endpoint.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use reqwest::{Client, StatusCode, Url};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::response::{ChartEnvelope, ChartResult};
use crate::models::{Bar, BarSeries, IndexQuote};
use crate::services::market_data::{FetchError, MarketDataProvider};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
    timezone: Tz,
    max_retries: usize,
}

impl YahooChartProvider {
    /// Provider against the public endpoint; bar dates are taken in `timezone`.
    pub fn new(timezone: Tz) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(DEFAULT_BASE_URL, client, timezone))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client, timezone: Tz) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timezone,
            max_retries: 3,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Decode(format!("bad base url {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Decode(format!("base url cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    /// One chart request; the last result of the envelope.
    async fn fetch_chart(&self, symbol: &str, range: &str) -> Result<ChartResult, FetchError> {
        let url = self.chart_url(symbol)?;
        let response = self
            .client
            .get(url)
            .query(&[("range", range), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NoData(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChartEnvelope =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        if let Some(error) = envelope.chart.error {
            debug!(symbol = %symbol, code = %error.code, "chart API reported {}", error.description);
            return Err(FetchError::NoData(symbol.to_string()));
        }
        envelope
            .chart
            .result
            .and_then(|mut results| results.pop())
            .ok_or_else(|| FetchError::NoData(symbol.to_string()))
    }

    async fn fetch_bars_once(&self, symbol: &str, lookback: &str) -> Result<BarSeries, FetchError> {
        let result = self.fetch_chart(symbol, lookback).await?;
        let bars = bars_from_chart(&result, self.timezone);
        if bars.is_empty() {
            return Err(FetchError::NoData(symbol.to_string()));
        }
        Ok(BarSeries::new(symbol, bars)?)
    }

    async fn fetch_quote_once(&self, symbol: &str) -> Result<IndexQuote, FetchError> {
        let result = self.fetch_chart(symbol, "1d").await?;
        quote_from_chart(symbol, &result)
    }

    /// Run `attempt` with exponential backoff on retryable failures.
    async fn with_retry<T, F, Fut>(&self, symbol: &str, attempt: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        attempt
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(250))
                    .with_max_times(self.max_retries),
            )
            .when(FetchError::is_retryable)
            .notify(|err: &FetchError, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "YahooChartProvider: retrying fetch for {}",
                    symbol
                );
            })
            .await
    }
}

/// Quote from the chart meta block. `previousClose` is only present on short
/// ranges; `chartPreviousClose` covers the rest.
pub fn quote_from_chart(symbol: &str, result: &ChartResult) -> Result<IndexQuote, FetchError> {
    let meta = result
        .meta
        .as_ref()
        .ok_or_else(|| FetchError::Decode(format!("chart for {symbol} has no meta block")))?;
    let price = meta
        .regular_market_price
        .ok_or_else(|| FetchError::NoData(symbol.to_string()))?;
    let previous_close = meta
        .previous_close
        .or(meta.chart_previous_close)
        .filter(|close| *close > 0.0)
        .ok_or_else(|| FetchError::Decode(format!("chart for {symbol} has no previous close")))?;
    Ok(IndexQuote::new(symbol, price, previous_close))
}

/// Zip the quote columns into bars, skipping rows with any missing field.
///
/// A repeated date (the live bar Yahoo appends during the session) replaces the
/// earlier row so dates stay strictly increasing.
pub fn bars_from_chart(result: &ChartResult, timezone: Tz) -> Vec<Bar> {
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    let mut bars: Vec<Bar> = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let field = |column: &[Option<f64>]| column.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
        ) else {
            continue;
        };
        let Some(date) = trading_date(ts, timezone) else {
            continue;
        };

        let bar = Bar::new(date, open, high, low, close, volume);
        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            Some(last) if last.date > date => continue,
            _ => bars.push(bar),
        }
    }
    bars
}

fn trading_date(timestamp: i64, timezone: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&timezone).date_naive())
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        lookback: &str,
    ) -> Result<BarSeries, FetchError> {
        self.with_retry(symbol, || self.fetch_bars_once(symbol, lookback))
            .await
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<IndexQuote, FetchError> {
        self.with_retry(symbol, || self.fetch_quote_once(symbol)).await
    }
}
