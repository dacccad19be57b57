//! Stockwatch Monitor
//!
//! Evaluates the watchlist during market hours, sends alerts and the daily
//! report to Telegram, and serves `/health` and `/metrics`.

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use stockwatch::calendar::TradingCalendar;
use stockwatch::config::{get_environment, Config, TelegramSettings};
use stockwatch::core::clock::SystemClock;
use stockwatch::core::http::{start_server, AppState};
use stockwatch::core::scheduler::MonitorLoop;
use stockwatch::jobs::JobContext;
use stockwatch::logging;
use stockwatch::metrics::Metrics;
use stockwatch::services::telegram::TelegramNotifier;
use stockwatch::services::yahoo::YahooChartProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = get_environment();
    info!("Starting Stockwatch Monitor");
    info!(environment = %env, "Environment");

    let config = Arc::new(Config::from_env()?);
    let telegram = TelegramSettings::from_env().map_err(|e| {
        error!(error = %e, "Telegram credentials are required for the monitor");
        e
    })?;

    let metrics = Arc::new(Metrics::new()?);
    let provider = Arc::new(YahooChartProvider::new(config.trading_hours.timezone)?);
    let notifier = Arc::new(TelegramNotifier::new(telegram)?);
    let ctx = Arc::new(JobContext::new(
        provider,
        notifier,
        config.clone(),
        Some(metrics.clone()),
    ));

    let calendar = TradingCalendar::from_config(&config);
    let monitor = Arc::new(MonitorLoop::new(ctx, calendar, Arc::new(SystemClock)));

    let app_state = AppState::new(monitor.state(), metrics);
    let port = config.http_port;
    tokio::spawn(async move {
        if let Err(e) = start_server(app_state, port).await {
            error!(error = %e, "HTTP server stopped");
        }
    });

    info!(
        symbols = config.symbols.len(),
        interval_secs = config.schedule.tick_interval.as_secs(),
        report_time = %config.schedule.report_time,
        "Monitor started, waiting for shutdown signal..."
    );
    monitor
        .run(async {
            let _ = signal::ctrl_c().await;
        })
        .await;

    info!("Monitor stopped");
    Ok(())
}
