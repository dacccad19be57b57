//! Market-hours monitoring loop.
//!
//! While the session is open the watchlist and the benchmark indices are
//! evaluated every tick interval. Outside the session the loop sleeps until the
//! next session start (or the daily report time, whichever comes first) instead
//! of polling. Neither sleep runs past a pending daily report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::calendar::TradingCalendar;
use crate::core::clock::Clock;
use crate::jobs::{
    check_market, evaluate_watchlist, send_alerts, send_daily_report, send_market_alert,
    JobContext,
};
use crate::models::AnalysisResult;
use crate::signals::MarketCondition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Active,
    Dormant,
}

/// Cross-tick state, published for the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerState {
    pub phase: Phase,
    pub market_open: bool,
    pub last_evaluation: Option<DateTime<Utc>>,
    pub last_alert: Option<DateTime<Utc>>,
    pub last_report_date: Option<NaiveDate>,
    pub last_report_at: Option<DateTime<Utc>>,
    pub last_market_check: Option<DateTime<Utc>>,
    /// Market conditions already alerted on, per local date.
    #[serde(skip)]
    pub market_alerted: Option<(NaiveDate, BTreeSet<MarketCondition>)>,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            phase: Phase::Dormant,
            market_open: false,
            last_evaluation: None,
            last_alert: None,
            last_report_date: None,
            last_report_at: None,
            last_market_check: None,
            market_alerted: None,
        }
    }
}

pub struct MonitorLoop {
    ctx: Arc<JobContext>,
    calendar: TradingCalendar,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<SchedulerState>>,
}

impl MonitorLoop {
    pub fn new(ctx: Arc<JobContext>, calendar: TradingCalendar, clock: Arc<dyn Clock>) -> Self {
        Self {
            ctx,
            calendar,
            clock,
            state: Arc::new(RwLock::new(SchedulerState::default())),
        }
    }

    /// Shared handle to the published state.
    pub fn state(&self) -> Arc<RwLock<SchedulerState>> {
        self.state.clone()
    }

    /// Weekday, inside `[report_time, report_time + window)`, not yet reported today.
    pub fn report_due(&self, now: DateTime<Utc>, state: &SchedulerState) -> bool {
        if !self.calendar.is_trading_day(now) {
            return false;
        }
        let today = self.calendar.local_date(now);
        if state.last_report_date == Some(today) {
            return false;
        }
        let schedule = &self.ctx.config.schedule;
        let Some(start) = self.calendar.at_local(today, schedule.report_time) else {
            return false;
        };
        let Ok(window) = chrono::Duration::from_std(schedule.report_window) else {
            return false;
        };
        start <= now && now < start + window
    }

    /// Today's report time while it still lies ahead and today is unreported.
    fn pending_report_at(&self, now: DateTime<Utc>, state: &SchedulerState) -> Option<DateTime<Utc>> {
        if !self.calendar.is_trading_day(now) {
            return None;
        }
        let today = self.calendar.local_date(now);
        if state.last_report_date == Some(today) {
            return None;
        }
        self.calendar
            .at_local(today, self.ctx.config.schedule.report_time)
            .filter(|report_at| *report_at > now)
    }

    /// Sleep between active ticks, shortened so a pending report is not stepped over.
    pub fn active_sleep(&self, now: DateTime<Utc>, state: &SchedulerState) -> Duration {
        let interval = self.ctx.config.schedule.tick_interval;
        match self
            .pending_report_at(now, state)
            .and_then(|report_at| (report_at - now).to_std().ok())
        {
            Some(until_report) if until_report < interval => until_report,
            _ => interval,
        }
    }

    /// How long to suspend outside the session.
    pub fn dormant_sleep(&self, now: DateTime<Utc>, state: &SchedulerState) -> Duration {
        let schedule = &self.ctx.config.schedule;
        if self.report_due(now, state) {
            // a delivery failed inside the window; try again shortly
            return schedule.retry_sleep;
        }

        let mut wake = self.calendar.next_trading_boundary(now);
        if let Some(report_at) = self.pending_report_at(now, state) {
            wake = Some(wake.map_or(report_at, |boundary| boundary.min(report_at)));
        }

        match wake.map(|at| (at - now).to_std()) {
            Some(Ok(sleep)) if !sleep.is_zero() => sleep,
            _ => {
                warn!(
                    retry_secs = schedule.retry_sleep.as_secs(),
                    "MonitorLoop: no usable wake-up time, using retry sleep"
                );
                schedule.retry_sleep
            }
        }
    }

    /// Run one tick at `now` and return how long to sleep before the next.
    pub async fn tick(&self, now: DateTime<Utc>) -> Duration {
        let open = self.calendar.is_market_open(now);
        let phase = if open { Phase::Active } else { Phase::Dormant };
        {
            let mut state = self.state.write().await;
            if state.phase != phase {
                info!(phase = ?phase, "MonitorLoop: entering {:?} phase", phase);
            }
            state.phase = phase;
            state.market_open = open;
        }
        if let Some(metrics) = &self.ctx.metrics {
            metrics.market_open.set(if open { 1.0 } else { 0.0 });
        }

        let mut batch: Option<Vec<AnalysisResult>> = None;
        if open {
            let results = evaluate_watchlist(&self.ctx).await;
            let alerts = send_alerts(&self.ctx, &results).await;
            {
                let mut state = self.state.write().await;
                state.last_evaluation = Some(now);
                if alerts.sent > 0 {
                    state.last_alert = Some(now);
                }
            }
            self.watch_market(now).await;
            batch = Some(results);
        }

        let snapshot = self.state.read().await.clone();
        if self.report_due(now, &snapshot) {
            let results = match batch {
                Some(results) => results,
                None => evaluate_watchlist(&self.ctx).await,
            };
            match send_daily_report(&self.ctx, &results, now).await {
                Ok(true) => {
                    let mut state = self.state.write().await;
                    state.last_report_date = Some(self.calendar.local_date(now));
                    state.last_report_at = Some(now);
                }
                Ok(false) => {}
                Err(err) => {
                    error!(error = %err, "MonitorLoop: daily report delivery failed, will retry");
                }
            }
        }

        let snapshot = self.state.read().await.clone();
        if open {
            self.active_sleep(now, &snapshot)
        } else {
            self.dormant_sleep(now, &snapshot)
        }
    }

    /// Market-condition check; alerts once per condition per local day.
    async fn watch_market(&self, now: DateTime<Utc>) {
        let Some(check) = check_market(&self.ctx).await else {
            return;
        };
        let today = self.calendar.local_date(now);
        let triggered: BTreeSet<MarketCondition> = check.alerts.keys().copied().collect();

        let is_new = {
            let mut state = self.state.write().await;
            state.last_market_check = Some(now);
            match &state.market_alerted {
                Some((date, seen)) if *date == today => !triggered.is_subset(seen),
                _ => !triggered.is_empty(),
            }
        };
        if !is_new {
            debug!(conditions = triggered.len(), "MonitorLoop: no new market conditions");
            return;
        }

        match send_market_alert(&self.ctx, &check, now).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                let seen = match state.market_alerted.take() {
                    Some((date, mut seen)) if date == today => {
                        seen.extend(triggered);
                        seen
                    }
                    _ => triggered,
                };
                state.market_alerted = Some((today, seen));
                state.last_alert = Some(now);
            }
            Err(err) => {
                error!(error = %err, "MonitorLoop: market alert delivery failed, will retry");
            }
        }
    }

    /// Loop until `shutdown` resolves. A tick in progress always completes.
    pub async fn run<S>(self: Arc<Self>, shutdown: S)
    where
        S: Future<Output = ()> + Send,
    {
        info!(
            clock = self.clock.name(),
            symbols = self.ctx.config.symbols.len(),
            "MonitorLoop: started"
        );
        tokio::pin!(shutdown);

        loop {
            let now = self.clock.now();
            let this = Arc::clone(&self);
            let sleep = match tokio::spawn(async move { this.tick(now).await }).await {
                Ok(sleep) => sleep,
                Err(err) => {
                    let backoff = self.ctx.config.schedule.fault_backoff;
                    error!(
                        error = %err,
                        backoff_secs = backoff.as_secs(),
                        "MonitorLoop: tick failed, backing off"
                    );
                    backoff
                }
            };

            debug!(sleep_secs = sleep.as_secs(), "MonitorLoop: sleeping");
            tokio::select! {
                _ = tokio::time::sleep(sleep) => {}
                _ = &mut shutdown => {
                    info!("MonitorLoop: shutdown requested, stopping");
                    break;
                }
            }
        }
    }
}
