//! Static process configuration.
//!
//! `Config::default()` carries the reference watchlist and constants.
//! `Config::from_env()` layers environment overrides on top; anything that
//! fails to parse is a configuration fault and must stop the process before
//! the scheduling loop starts.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::calendar::holidays::default_holidays;
use crate::models::signal::SignalKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("unknown timezone identifier '{0}'")]
    UnknownTimezone(String),
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// One watched instrument: exchange code and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedSymbol {
    pub code: String,
    pub name: String,
}

impl WatchedSymbol {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Per-signal integer weights used by the scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalWeights {
    weights: BTreeMap<SignalKind, u32>,
}

impl SignalWeights {
    pub fn get(&self, kind: SignalKind) -> u32 {
        self.weights.get(&kind).copied().unwrap_or(0)
    }

    pub fn set(&mut self, kind: SignalKind, weight: u32) {
        self.weights.insert(kind, weight);
    }

    pub fn with(mut self, kind: SignalKind, weight: u32) -> Self {
        self.set(kind, weight);
        self
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (SignalKind::MaCrossover, 20),
            (SignalKind::EmaCrossover, 15),
            (SignalKind::MacdBullish, 12),
            (SignalKind::MacdPositive, 8),
            (SignalKind::RsiOversold, 25),
            (SignalKind::BbOversold, 20),
            (SignalKind::HighVolume, 10),
            (SignalKind::Uptrend, 15),
        ]);
        Self { weights }
    }
}

/// Score thresholds shared by the alert path and the daily report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreThresholds {
    pub alert: u32,
    pub strong: u32,
    pub moderate: u32,
    pub weak: u32,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            alert: 50,
            strong: 70,
            moderate: 50,
            weak: 30,
        }
    }
}

/// Indicator window lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub sma_short: usize,
    pub sma_medium: usize,
    pub sma_long: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub macd_signal: usize,
    pub bb: usize,
    pub bb_std_multiplier: f64,
    pub volume_avg: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: 14,
            sma_short: 20,
            sma_medium: 50,
            sma_long: 200,
            ema_fast: 12,
            ema_slow: 26,
            macd_signal: 9,
            bb: 20,
            bb_std_multiplier: 2.0,
            volume_avg: 20,
        }
    }
}

/// Level thresholds consulted by the signal generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalLevels {
    pub rsi_oversold: f64,
    /// Reserved for a sell-side rule; parsed but not consulted by any signal.
    pub rsi_overbought: f64,
    pub volume_spike_multiplier: f64,
}

impl Default for SignalLevels {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            volume_spike_multiplier: 1.5,
        }
    }
}

/// Market session bounds, local to `timezone`. The session is `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradingHours {
    pub timezone: Tz,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for TradingHours {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Kolkata,
            start: hm(9, 15),
            end: hm(15, 30),
        }
    }
}

/// Loop cadence knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub report_time: NaiveTime,
    pub report_window: Duration,
    pub tick_interval: Duration,
    pub retry_sleep: Duration,
    pub fault_backoff: Duration,
    pub concurrency: usize,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            report_time: hm(13, 0),
            report_window: Duration::from_secs(10 * 60),
            tick_interval: Duration::from_secs(300),
            retry_sleep: Duration::from_secs(60),
            fault_backoff: Duration::from_secs(300),
            concurrency: 4,
        }
    }
}

/// Broad-market downturn checks on two benchmark indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketWatchSettings {
    pub enabled: bool,
    pub benchmark: WatchedSymbol,
    pub secondary: WatchedSymbol,
    /// Benchmark day change (percent, positive) below which a sharp drop is flagged.
    pub sharp_drop_pct: f64,
    pub gap_down_pct: f64,
}

impl Default for MarketWatchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            benchmark: WatchedSymbol::new("^NSEI", "Nifty 50"),
            secondary: WatchedSymbol::new("^BSESN", "Sensex"),
            sharp_drop_pct: 2.0,
            gap_down_pct: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbols: Vec<WatchedSymbol>,
    pub weights: SignalWeights,
    pub thresholds: ScoreThresholds,
    pub periods: IndicatorPeriods,
    pub levels: SignalLevels,
    pub trading_hours: TradingHours,
    pub holidays: Vec<NaiveDate>,
    pub schedule: ScheduleSettings,
    pub market_watch: MarketWatchSettings,
    pub lookback: String,
    pub http_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec![
                WatchedSymbol::new("SUNPHARMA.NS", "Sunpharma"),
                WatchedSymbol::new("HDFCBANK.NS", "HDFC Bank"),
                WatchedSymbol::new("TATASTEEL.NS", "Tata Steel"),
                WatchedSymbol::new("HINDUNILVR.NS", "Hindustan Unilever"),
                WatchedSymbol::new("TATAMOTORS.NS", "Tata Motors"),
                WatchedSymbol::new("^NSEI", "Nifty 50"),
            ],
            weights: SignalWeights::default(),
            thresholds: ScoreThresholds::default(),
            periods: IndicatorPeriods::default(),
            levels: SignalLevels::default(),
            trading_hours: TradingHours::default(),
            holidays: default_holidays(),
            schedule: ScheduleSettings::default(),
            market_watch: MarketWatchSettings::default(),
            lookback: "1y".to_string(),
            http_port: 10000,
        }
    }
}

impl Config {
    /// Build a configuration from defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut config = Config::default();

        if let Some(raw) = get("WATCHLIST") {
            config.symbols = parse_watchlist(&raw)?;
        }
        if let Some(raw) = get("SIGNAL_WEIGHTS") {
            config.weights = parse_weights(&raw, config.weights)?;
        }

        let thresholds = &mut config.thresholds;
        override_parsed(&get, "ALERT_THRESHOLD", &mut thresholds.alert)?;
        override_parsed(&get, "STRONG_BUY_THRESHOLD", &mut thresholds.strong)?;
        override_parsed(&get, "MODERATE_BUY_THRESHOLD", &mut thresholds.moderate)?;
        override_parsed(&get, "WEAK_BUY_THRESHOLD", &mut thresholds.weak)?;
        if !(thresholds.weak <= thresholds.moderate && thresholds.moderate <= thresholds.strong) {
            return Err(ConfigError::invalid(
                "STRONG_BUY_THRESHOLD",
                "thresholds must satisfy weak <= moderate <= strong",
            ));
        }

        let levels = &mut config.levels;
        override_parsed(&get, "RSI_OVERSOLD", &mut levels.rsi_oversold)?;
        override_parsed(&get, "RSI_OVERBOUGHT", &mut levels.rsi_overbought)?;
        override_parsed(
            &get,
            "VOLUME_SPIKE_MULTIPLIER",
            &mut levels.volume_spike_multiplier,
        )?;

        if let Some(raw) = get("MARKET_TIMEZONE") {
            config.trading_hours.timezone = raw
                .parse::<Tz>()
                .map_err(|_| ConfigError::UnknownTimezone(raw.clone()))?;
        }
        if let Some(raw) = get("TRADING_START") {
            config.trading_hours.start = parse_clock("TRADING_START", &raw)?;
        }
        if let Some(raw) = get("TRADING_END") {
            config.trading_hours.end = parse_clock("TRADING_END", &raw)?;
        }
        if config.trading_hours.start >= config.trading_hours.end {
            return Err(ConfigError::invalid(
                "TRADING_END",
                "trading session must end after it starts",
            ));
        }
        if let Some(raw) = get("DAILY_REPORT_TIME") {
            config.schedule.report_time = parse_clock("DAILY_REPORT_TIME", &raw)?;
        }

        let mut interval_secs = config.schedule.tick_interval.as_secs();
        override_parsed(&get, "EVAL_INTERVAL_SECONDS", &mut interval_secs)?;
        if interval_secs == 0 {
            return Err(ConfigError::invalid(
                "EVAL_INTERVAL_SECONDS",
                "must be greater than zero",
            ));
        }
        config.schedule.tick_interval = Duration::from_secs(interval_secs);
        if config.schedule.tick_interval >= config.schedule.report_window {
            return Err(ConfigError::invalid(
                "EVAL_INTERVAL_SECONDS",
                format!(
                    "must be shorter than the {}s daily report window",
                    config.schedule.report_window.as_secs()
                ),
            ));
        }
        override_parsed(&get, "WORKER_CONCURRENCY", &mut config.schedule.concurrency)?;
        config.schedule.concurrency = config.schedule.concurrency.max(1);

        let market = &mut config.market_watch;
        override_parsed(&get, "MARKET_ALERTS_ENABLED", &mut market.enabled)?;
        override_parsed(&get, "MARKET_SHARP_DROP_PCT", &mut market.sharp_drop_pct)?;
        override_parsed(&get, "MARKET_GAP_DOWN_PCT", &mut market.gap_down_pct)?;
        if market.sharp_drop_pct < 0.0 || market.gap_down_pct < 0.0 {
            return Err(ConfigError::invalid(
                "MARKET_SHARP_DROP_PCT",
                "drop thresholds are positive percentages",
            ));
        }

        if let Some(raw) = get("LOOKBACK_PERIOD") {
            config.lookback = raw;
        }
        override_parsed(&get, "PORT", &mut config.http_port)?;

        Ok(config)
    }

    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.symbols
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.name.as_str())
            .unwrap_or(code)
    }
}

/// Credentials for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramSettings {
    /// Read credentials; both variables must be present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let chat_id = required("TELEGRAM_CHAT_ID")?;
        Ok(Self { bot_token, chat_id })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

/// Deployment environment name (`production`, `sandbox`, ...).
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

fn override_parsed<T, G>(get: &G, key: &str, slot: &mut T) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        *slot = raw
            .parse()
            .map_err(|_| ConfigError::invalid(key, format!("cannot parse '{raw}'")))?;
    }
    Ok(())
}

fn parse_clock(key: &str, raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| ConfigError::invalid(key, format!("expected HH:MM, got '{raw}'")))
}

fn parse_watchlist(raw: &str) -> Result<Vec<WatchedSymbol>, ConfigError> {
    let mut symbols = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let symbol = match entry.split_once('=') {
            Some((code, name)) if !code.trim().is_empty() => {
                let name = if name.trim().is_empty() { code } else { name };
                WatchedSymbol::new(code.trim(), name.trim())
            }
            Some(_) => {
                return Err(ConfigError::invalid(
                    "WATCHLIST",
                    format!("empty symbol code in '{entry}'"),
                ))
            }
            None => WatchedSymbol::new(entry, entry),
        };
        symbols.push(symbol);
    }
    if symbols.is_empty() {
        return Err(ConfigError::invalid("WATCHLIST", "no symbols configured"));
    }
    Ok(symbols)
}

fn parse_weights(raw: &str, mut weights: SignalWeights) -> Result<SignalWeights, ConfigError> {
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, value) = entry.split_once('=').ok_or_else(|| {
            ConfigError::invalid("SIGNAL_WEIGHTS", format!("expected Name=weight, got '{entry}'"))
        })?;
        let kind: SignalKind = name
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid("SIGNAL_WEIGHTS", format!("unknown signal '{name}'")))?;
        let weight: u32 = value.trim().parse().map_err(|_| {
            ConfigError::invalid("SIGNAL_WEIGHTS", format!("weight for {name} must be an integer"))
        })?;
        weights.set(kind, weight);
    }
    Ok(weights)
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
