//! Per-symbol evaluation, watchlist fan-out, alert and report dispatch

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::WatchedSymbol;
use crate::indicators::RECOMMENDED_BARS;
use crate::jobs::context::JobContext;
use crate::models::{AnalysisResult, MarketSnapshot};
use crate::report::{format_alert, format_daily_report, format_market_alert};
use crate::services::market_data::FetchError;
use crate::services::notifier::NotifyError;
use crate::signals::{check_market_conditions, MarketAlerts, MIN_BARS};

/// Fetch and analyse one symbol.
///
/// Data failures are logged and turn into `None`; they never abort the batch.
pub async fn analyze_symbol(ctx: &JobContext, symbol: &WatchedSymbol) -> Option<AnalysisResult> {
    debug!(symbol = %symbol.code, "analyze_symbol: fetching bars for {}", symbol.code);

    let series = match ctx
        .provider
        .fetch_daily_bars(&symbol.code, &ctx.config.lookback)
        .await
    {
        Ok(series) => series,
        Err(err) => {
            match &err {
                FetchError::NoData(_) => {
                    warn!(symbol = %symbol.code, "analyze_symbol: no data for {}, skipping", symbol.code)
                }
                other => warn!(
                    symbol = %symbol.code,
                    error = %other,
                    "analyze_symbol: fetch failed for {}, skipping",
                    symbol.code
                ),
            }
            if let Some(metrics) = &ctx.metrics {
                metrics.symbols_skipped_total.inc();
            }
            return None;
        }
    };

    if series.len() < MIN_BARS {
        warn!(
            symbol = %symbol.code,
            bars = series.len(),
            "analyze_symbol: insufficient history for {}, crossover rules disabled",
            symbol.code
        );
    } else if series.len() < RECOMMENDED_BARS {
        debug!(
            symbol = %symbol.code,
            bars = series.len(),
            "analyze_symbol: short history for {}, long averages stay undefined",
            symbol.code
        );
    }

    let Some(result) = ctx.engine.evaluate(&series) else {
        warn!(symbol = %symbol.code, "analyze_symbol: empty series for {}, skipping", symbol.code);
        if let Some(metrics) = &ctx.metrics {
            metrics.symbols_skipped_total.inc();
        }
        return None;
    };

    if let Some(metrics) = &ctx.metrics {
        metrics.evaluations_total.inc();
    }
    info!(
        symbol = %symbol.code,
        score = result.score,
        signals = result.signals.len(),
        bars = series.len(),
        "{} scored {}/100",
        symbol.name,
        result.score
    );
    Some(result)
}

/// Analyse the whole watchlist. Results come back in watchlist order.
pub async fn evaluate_watchlist(ctx: &JobContext) -> Vec<AnalysisResult> {
    let started = Instant::now();
    let concurrency = ctx.config.schedule.concurrency.max(1);

    // owned symbols: the tick future must stay `Send` for `tokio::spawn`
    let symbols = ctx.config.symbols.clone();
    let mut indexed: Vec<(usize, Option<AnalysisResult>)> = stream::iter(symbols.into_iter().enumerate())
        .map(|(index, symbol)| async move { (index, analyze_symbol(ctx, &symbol).await) })
        .buffer_unordered(concurrency)
        .collect()
        .await;
    indexed.sort_by_key(|(index, _)| *index);

    let results: Vec<AnalysisResult> = indexed.into_iter().filter_map(|(_, r)| r).collect();

    let elapsed = started.elapsed();
    if let Some(metrics) = &ctx.metrics {
        metrics
            .evaluation_duration_seconds
            .observe(elapsed.as_secs_f64());
    }
    info!(
        analysed = results.len(),
        watched = ctx.config.symbols.len(),
        duration_ms = elapsed.as_millis() as u64,
        "evaluate_watchlist: analysed {}/{} symbols",
        results.len(),
        ctx.config.symbols.len()
    );
    results
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AlertOutcome {
    pub sent: usize,
    pub failed: usize,
}

/// One alert per result at or above the alert threshold. Failures are not retried here.
pub async fn send_alerts(ctx: &JobContext, results: &[AnalysisResult]) -> AlertOutcome {
    let thresholds = &ctx.config.thresholds;
    let mut outcome = AlertOutcome::default();

    for result in results.iter().filter(|r| r.score >= thresholds.alert) {
        let name = ctx.config.display_name(&result.symbol);
        let text = format_alert(result, name, thresholds);
        match ctx.notifier.send(&text).await {
            Ok(()) => {
                outcome.sent += 1;
                if let Some(metrics) = &ctx.metrics {
                    metrics.alerts_sent_total.inc();
                }
                info!(symbol = %result.symbol, score = result.score, "alert sent for {}", name);
            }
            Err(err) => {
                outcome.failed += 1;
                if let Some(metrics) = &ctx.metrics {
                    metrics.notifications_failed_total.inc();
                }
                error!(symbol = %result.symbol, error = %err, "failed to send alert for {}", name);
            }
        }
    }
    outcome
}

/// Build and deliver the daily report.
///
/// `Ok(false)` when there was nothing to report; the caller should not mark
/// the day as reported in that case.
pub async fn send_daily_report(
    ctx: &JobContext,
    results: &[AnalysisResult],
    now: DateTime<Utc>,
) -> Result<bool, NotifyError> {
    let Some(text) = format_daily_report(results, &ctx.config, now) else {
        warn!("send_daily_report: no results to report");
        return Ok(false);
    };

    match ctx.notifier.send(&text).await {
        Ok(()) => {
            if let Some(metrics) = &ctx.metrics {
                metrics.reports_sent_total.inc();
            }
            info!(symbols = results.len(), "daily report sent");
            Ok(true)
        }
        Err(err) => {
            if let Some(metrics) = &ctx.metrics {
                metrics.notifications_failed_total.inc();
            }
            Err(err)
        }
    }
}

/// Benchmark quotes from one tick and the downturn rules they trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketCheck {
    pub snapshot: MarketSnapshot,
    pub alerts: MarketAlerts,
}

/// Fetch both benchmark indices and evaluate the downturn rules.
///
/// `None` when market checks are disabled or either quote is unavailable.
pub async fn check_market(ctx: &JobContext) -> Option<MarketCheck> {
    let settings = &ctx.config.market_watch;
    if !settings.enabled {
        return None;
    }

    let quotes = tokio::try_join!(
        ctx.provider.fetch_quote(&settings.benchmark.code),
        ctx.provider.fetch_quote(&settings.secondary.code),
    );
    let (benchmark, secondary) = match quotes {
        Ok(quotes) => quotes,
        Err(err) => {
            warn!(error = %err, "check_market: index quotes unavailable, skipping market check");
            return None;
        }
    };

    let snapshot = MarketSnapshot {
        benchmark,
        secondary,
    };
    let alerts = check_market_conditions(&snapshot, settings);
    info!(
        benchmark_pct = snapshot.benchmark.change_percent(),
        secondary_pct = snapshot.secondary.change_percent(),
        alerts = alerts.len(),
        "check_market: {} {:+.2}% | {} {:+.2}%",
        settings.benchmark.name,
        snapshot.benchmark.change_percent(),
        settings.secondary.name,
        snapshot.secondary.change_percent()
    );
    Some(MarketCheck { snapshot, alerts })
}

/// Deliver the market alert for `check`.
pub async fn send_market_alert(
    ctx: &JobContext,
    check: &MarketCheck,
    now: DateTime<Utc>,
) -> Result<(), NotifyError> {
    let text = format_market_alert(
        &check.snapshot,
        &check.alerts,
        &ctx.config.market_watch,
        now,
        ctx.config.trading_hours.timezone,
    );
    match ctx.notifier.send(&text).await {
        Ok(()) => {
            if let Some(metrics) = &ctx.metrics {
                metrics.market_alerts_sent_total.inc();
            }
            info!(conditions = check.alerts.len(), "market alert sent");
            Ok(())
        }
        Err(err) => {
            if let Some(metrics) = &ctx.metrics {
                metrics.notifications_failed_total.inc();
            }
            Err(err)
        }
    }
}
