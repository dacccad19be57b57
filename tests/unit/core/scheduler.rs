//! Scenario tests for the monitoring loop, driven by explicit instants

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stockwatch::calendar::TradingCalendar;
use stockwatch::config::{Config, WatchedSymbol};
use stockwatch::core::clock::ManualClock;
use stockwatch::core::scheduler::{MonitorLoop, Phase};
use stockwatch::jobs::{evaluate_watchlist, JobContext};
use stockwatch::models::{BarSeries, IndexQuote};
use stockwatch::services::market_data::{FetchError, MarketDataProvider};

use crate::support::{bars_from_closes, linear, FixtureProvider, RecordingNotifier};

const REPORT_HEADER: &str = "DAILY STOCK MARKET REPORT";
const MARKET_HEADER: &str = "MARKET ALERT";

fn ist(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    chrono_tz::Asia::Kolkata
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn config(alert_threshold: u32) -> Config {
    let mut config = Config::default();
    config.symbols = vec![
        WatchedSymbol::new("RISING.NS", "Rising Ltd"),
        WatchedSymbol::new("MISSING.NS", "Missing Ltd"),
    ];
    config.thresholds.alert = alert_threshold;
    config
}

struct Harness {
    monitor: Arc<MonitorLoop>,
    provider: Arc<FixtureProvider>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(config: Config, notifier: RecordingNotifier) -> Harness {
    harness_with(config, notifier, FixtureProvider::default())
}

fn harness_with(config: Config, notifier: RecordingNotifier, provider: FixtureProvider) -> Harness {
    let provider = Arc::new(
        provider.with("RISING.NS", bars_from_closes(&linear(252, 100.0, 200.0), 1_000.0)),
    );
    let notifier = Arc::new(notifier);
    let config = Arc::new(config);
    let ctx = JobContext::new(provider.clone(), notifier.clone(), config.clone(), None);
    let clock = Arc::new(ManualClock::new(ist(2025, 3, 8, 11, 0)));
    let monitor = Arc::new(MonitorLoop::new(
        Arc::new(ctx),
        TradingCalendar::from_config(&config),
        clock,
    ));
    Harness {
        monitor,
        provider,
        notifier,
    }
}

#[tokio::test]
async fn test_watchlist_skips_symbols_without_data() {
    let h = harness(config(101), RecordingNotifier::default());
    let ctx = JobContext::new(
        h.provider.clone(),
        h.notifier.clone(),
        Arc::new(config(101)),
        None,
    );
    let results = evaluate_watchlist(&ctx).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbol, "RISING.NS");
    assert_eq!(h.provider.calls(), 2);
}

#[tokio::test]
async fn test_active_tick_evaluates_and_alerts() {
    let h = harness(config(10), RecordingNotifier::default());
    let now = ist(2025, 3, 4, 10, 0);

    let sleep = h.monitor.tick(now).await;

    assert_eq!(sleep, Duration::from_secs(300));
    assert_eq!(h.notifier.attempts_containing("STOCK ALERT: Rising Ltd"), 1);
    let state = h.monitor.state();
    let state = state.read().await;
    assert_eq!(state.phase, Phase::Active);
    assert!(state.market_open);
    assert_eq!(state.last_evaluation, Some(now));
    assert_eq!(state.last_alert, Some(now));
    assert_eq!(state.last_report_date, None);
}

#[tokio::test]
async fn test_dormant_tick_sleeps_until_session_without_fetching() {
    let h = harness(config(10), RecordingNotifier::default());
    let sleep = h.monitor.tick(ist(2025, 3, 8, 11, 0)).await;

    assert_eq!(sleep, Duration::from_secs(46 * 3600 + 15 * 60));
    assert_eq!(h.provider.calls(), 0);
    assert!(h.notifier.attempts().is_empty());
    assert_eq!(h.monitor.state().read().await.phase, Phase::Dormant);
}

#[tokio::test]
async fn test_daily_report_sent_once_per_day() {
    let h = harness(config(101), RecordingNotifier::default());
    for minute in [0, 3, 6, 9] {
        h.monitor.tick(ist(2025, 3, 4, 13, minute)).await;
    }

    assert_eq!(h.notifier.attempts_containing(REPORT_HEADER), 1);
    let state = h.monitor.state();
    let state = state.read().await;
    assert_eq!(state.last_report_date, NaiveDate::from_ymd_opt(2025, 3, 4));
    assert_eq!(state.last_report_at, Some(ist(2025, 3, 4, 13, 0)));

    drop(state);
    // next trading day reports again
    h.monitor.tick(ist(2025, 3, 5, 13, 1)).await;
    assert_eq!(h.notifier.attempts_containing(REPORT_HEADER), 2);
}

#[tokio::test]
async fn test_failed_report_is_retried_on_a_later_tick() {
    let h = harness(config(101), RecordingNotifier::failing(1));

    h.monitor.tick(ist(2025, 3, 4, 13, 0)).await;
    assert_eq!(h.monitor.state().read().await.last_report_date, None);

    h.monitor.tick(ist(2025, 3, 4, 13, 5)).await;
    assert_eq!(h.notifier.attempts_containing(REPORT_HEADER), 2);
    assert_eq!(
        h.monitor.state().read().await.last_report_date,
        NaiveDate::from_ymd_opt(2025, 3, 4)
    );
}

#[tokio::test]
async fn test_report_fires_on_a_holiday_outside_the_session() {
    let h = harness(config(101), RecordingNotifier::default());

    // 2025-03-14 is a holiday: no session, but still a weekday
    let sleep = h.monitor.tick(ist(2025, 3, 14, 13, 2)).await;

    assert_eq!(h.notifier.attempts_containing(REPORT_HEADER), 1);
    assert!(sleep > Duration::from_secs(60));
    assert!(!h.monitor.state().read().await.market_open);
}

#[tokio::test]
async fn test_run_stops_on_shutdown_after_current_tick() {
    let h = harness(config(10), RecordingNotifier::default());
    let state = h.monitor.state();

    tokio::time::timeout(Duration::from_secs(5), h.monitor.clone().run(async {}))
        .await
        .expect("loop should stop promptly");

    // the clock reads Saturday, so the single tick was dormant
    assert_eq!(state.read().await.phase, Phase::Dormant);
    assert_eq!(h.provider.calls(), 0);
}

#[tokio::test]
async fn test_long_tick_interval_still_lands_on_report_time() {
    let mut config = config(101);
    config.schedule.tick_interval = Duration::from_secs(900);
    let h = harness(config, RecordingNotifier::default());

    let mut now = ist(2025, 3, 4, 12, 55);
    let close = ist(2025, 3, 4, 15, 30);
    let mut ticks = Vec::new();
    while now < close {
        ticks.push(now);
        let sleep = h.monitor.tick(now).await;
        now += chrono::Duration::from_std(sleep).unwrap();
    }

    assert_eq!(ticks[1], ist(2025, 3, 4, 13, 0));
    assert_eq!(h.notifier.attempts_containing(REPORT_HEADER), 1);
    assert_eq!(
        h.monitor.state().read().await.last_report_at,
        Some(ist(2025, 3, 4, 13, 0))
    );
}

/// Panics on its first fetch, then serves nothing; records when each fetch ran.
#[derive(Default)]
struct PanicOnceProvider {
    panicked: AtomicBool,
    fetched_at: Mutex<Vec<tokio::time::Instant>>,
}

#[async_trait]
impl MarketDataProvider for PanicOnceProvider {
    async fn fetch_daily_bars(&self, symbol: &str, _lookback: &str) -> Result<BarSeries, FetchError> {
        self.fetched_at.lock().unwrap().push(tokio::time::Instant::now());
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("feed exploded while fetching {symbol}");
        }
        Err(FetchError::NoData(symbol.to_string()))
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<IndexQuote, FetchError> {
        Err(FetchError::NoData(symbol.to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_panicking_tick_backs_off_and_loop_survives() {
    let mut config = config(101);
    config.symbols = vec![WatchedSymbol::new("RISING.NS", "Rising Ltd")];
    config.schedule.fault_backoff = Duration::from_secs(120);
    let config = Arc::new(config);

    let provider = Arc::new(PanicOnceProvider::default());
    let ctx = JobContext::new(
        provider.clone(),
        Arc::new(RecordingNotifier::default()),
        config.clone(),
        None,
    );
    // Tuesday mid-session: every tick is active
    let clock = Arc::new(ManualClock::new(ist(2025, 3, 4, 10, 0)));
    let monitor = Arc::new(MonitorLoop::new(
        Arc::new(ctx),
        TradingCalendar::from_config(&config),
        clock,
    ));

    // stop after the backoff but before the following tick interval elapses
    monitor
        .clone()
        .run(tokio::time::sleep(Duration::from_secs(150)))
        .await;

    let fetched_at = provider.fetched_at.lock().unwrap().clone();
    assert_eq!(fetched_at.len(), 2);
    assert_eq!(fetched_at[1] - fetched_at[0], Duration::from_secs(120));

    let state = monitor.state();
    let state = state.read().await;
    assert_eq!(state.phase, Phase::Active);
    assert_eq!(state.last_evaluation, Some(ist(2025, 3, 4, 10, 0)));
}

#[tokio::test]
async fn test_market_alert_only_repeats_for_new_conditions() {
    let provider = FixtureProvider::default()
        .with_quote("^NSEI", 99.6, 100.0)
        .with_quote("^BSESN", 99.8, 100.0);
    let h = harness_with(config(101), RecordingNotifier::default(), provider);

    // both indices mildly red
    h.monitor.tick(ist(2025, 3, 4, 10, 0)).await;
    h.monitor.tick(ist(2025, 3, 4, 10, 5)).await;
    assert_eq!(h.notifier.attempts_containing(MARKET_HEADER), 1);
    assert_eq!(h.notifier.attempts_containing("Both indices in red"), 1);

    // the slide deepens into a gap down
    h.provider.set_quote("^NSEI", 98.5, 100.0);
    h.monitor.tick(ist(2025, 3, 4, 10, 10)).await;
    assert_eq!(h.notifier.attempts_containing(MARKET_HEADER), 2);
    assert_eq!(h.notifier.attempts_containing("Market gap down"), 1);

    // a new day starts from a clean slate
    h.monitor.tick(ist(2025, 3, 5, 10, 0)).await;
    assert_eq!(h.notifier.attempts_containing(MARKET_HEADER), 3);
}

#[tokio::test]
async fn test_green_market_sends_nothing() {
    let provider = FixtureProvider::default()
        .with_quote("^NSEI", 100.4, 100.0)
        .with_quote("^BSESN", 99.9, 100.0);
    let h = harness_with(config(101), RecordingNotifier::default(), provider);

    h.monitor.tick(ist(2025, 3, 4, 10, 0)).await;

    assert_eq!(h.notifier.attempts_containing(MARKET_HEADER), 0);
    let state = h.monitor.state();
    let state = state.read().await;
    assert_eq!(state.last_market_check, Some(ist(2025, 3, 4, 10, 0)));
    assert_eq!(state.last_alert, None);
}
