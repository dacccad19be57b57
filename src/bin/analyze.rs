//! Stockwatch single pass
//!
//! Analyses every watched symbol once, prints the results and exits. Alerts
//! go to Telegram when credentials are present, otherwise to the log.

use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{info, warn};

use stockwatch::config::{Config, TelegramSettings};
use stockwatch::jobs::{evaluate_watchlist, send_alerts, JobContext};
use stockwatch::logging;
use stockwatch::report::{format_analysis, format_legend};
use stockwatch::services::notifier::{LogNotifier, Notifier};
use stockwatch::services::telegram::TelegramNotifier;
use stockwatch::services::yahoo::YahooChartProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Arc::new(Config::from_env()?);
    let notifier: Arc<dyn Notifier> = match TelegramSettings::from_env() {
        Ok(settings) => Arc::new(TelegramNotifier::new(settings)?),
        Err(e) => {
            warn!(error = %e, "Telegram not configured, messages go to the log");
            Arc::new(LogNotifier)
        }
    };
    let provider = Arc::new(YahooChartProvider::new(config.trading_hours.timezone)?);
    let ctx = JobContext::new(provider, notifier, config.clone(), None);

    info!(symbols = config.symbols.len(), "Running single analysis pass");
    let results = evaluate_watchlist(&ctx).await;

    for result in &results {
        let name = config.display_name(&result.symbol);
        println!("{}", format_analysis(result, name, &config.thresholds));
    }
    println!("{}", format_legend(&config.thresholds));

    let alerts = send_alerts(&ctx, &results).await;
    info!(
        analysed = results.len(),
        alerts_sent = alerts.sent,
        alerts_failed = alerts.failed,
        "Single pass complete"
    );

    Ok(())
}
