//! One monitoring tick end-to-end against mocked Yahoo and Telegram

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use wiremock::MockServer;

use stockwatch::calendar::TradingCalendar;
use stockwatch::config::{Config, WatchedSymbol};
use stockwatch::core::clock::SystemClock;
use stockwatch::core::scheduler::MonitorLoop;
use stockwatch::jobs::JobContext;
use stockwatch::metrics::Metrics;
use stockwatch::services::telegram::TelegramNotifier;
use stockwatch::services::yahoo::YahooChartProvider;

use crate::test_utils::{
    chart_body, mock_chart, mock_index, mock_telegram_ok, mock_unknown_symbols, quote_body,
    received_bodies, rising_closes, telegram_settings,
};

#[tokio::test]
async fn report_tick_alerts_and_reports_through_telegram() {
    let yahoo = MockServer::start().await;
    mock_chart(&yahoo, "TEST.NS", chart_body(&rising_closes(220))).await;
    mock_unknown_symbols(&yahoo).await;

    let telegram = MockServer::start().await;
    mock_telegram_ok(&telegram).await;

    let mut config = Config::default();
    config.symbols = vec![
        WatchedSymbol::new("TEST.NS", "Test Industries"),
        WatchedSymbol::new("GONE.NS", "Gone Ltd"),
    ];
    config.thresholds.alert = 10;
    let config = Arc::new(config);

    let metrics = Arc::new(Metrics::new().unwrap());
    let provider = Arc::new(YahooChartProvider::with_client(
        yahoo.uri(),
        reqwest::Client::new(),
        config.trading_hours.timezone,
    ));
    let notifier = Arc::new(TelegramNotifier::with_client(
        telegram.uri(),
        reqwest::Client::new(),
        telegram_settings(),
    ));
    let ctx = Arc::new(JobContext::new(provider, notifier, config.clone(), Some(metrics.clone())));
    let monitor = MonitorLoop::new(ctx, TradingCalendar::from_config(&config), Arc::new(SystemClock));

    // Tuesday 2025-03-04 13:00 IST: session open and report window open
    let now = chrono_tz::Asia::Kolkata
        .with_ymd_and_hms(2025, 3, 4, 13, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    monitor.tick(now).await;

    let bodies = received_bodies(&telegram).await;
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0].contains("STOCK+ALERT%3A+Test+Industries"));
    assert!(bodies[1].contains("DAILY+STOCK+MARKET+REPORT"));
    assert!(!bodies.iter().any(|b| b.contains("Gone+Ltd")));

    assert_eq!(metrics.evaluations_total.get(), 1);
    assert_eq!(metrics.symbols_skipped_total.get(), 1);
    assert_eq!(metrics.alerts_sent_total.get(), 1);
    assert_eq!(metrics.reports_sent_total.get(), 1);

    let state = monitor.state();
    assert!(state.read().await.last_report_at.is_some());
}

#[tokio::test]
async fn falling_market_raises_one_market_alert_per_day() {
    let yahoo = MockServer::start().await;
    mock_chart(&yahoo, "TEST.NS", chart_body(&rising_closes(220))).await;
    mock_index(&yahoo, "NSEI", quote_body(21_450.0, 22_000.0)).await;
    mock_index(&yahoo, "BSESN", quote_body(72_635.0, 73_000.0)).await;

    let telegram = MockServer::start().await;
    mock_telegram_ok(&telegram).await;

    let mut config = Config::default();
    config.symbols = vec![WatchedSymbol::new("TEST.NS", "Test Industries")];
    config.thresholds.alert = 101;
    let config = Arc::new(config);

    let metrics = Arc::new(Metrics::new().unwrap());
    let provider = Arc::new(YahooChartProvider::with_client(
        yahoo.uri(),
        reqwest::Client::new(),
        config.trading_hours.timezone,
    ));
    let notifier = Arc::new(TelegramNotifier::with_client(
        telegram.uri(),
        reqwest::Client::new(),
        telegram_settings(),
    ));
    let ctx = Arc::new(JobContext::new(provider, notifier, config.clone(), Some(metrics.clone())));
    let monitor = MonitorLoop::new(ctx, TradingCalendar::from_config(&config), Arc::new(SystemClock));

    let ist = chrono_tz::Asia::Kolkata;
    let first = ist.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap().with_timezone(&Utc);
    let second = ist.with_ymd_and_hms(2025, 3, 4, 10, 5, 0).unwrap().with_timezone(&Utc);
    monitor.tick(first).await;
    monitor.tick(second).await;

    let bodies = received_bodies(&telegram).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("MARKET+ALERT"));
    assert!(bodies[0].contains("BEARISH"));
    assert_eq!(metrics.market_alerts_sent_total.get(), 1);
    assert_eq!(metrics.alerts_sent_total.get(), 0);

    let state = monitor.state();
    let state = state.read().await;
    assert_eq!(state.last_market_check, Some(second));
    assert_eq!(state.last_alert, Some(first));
}
