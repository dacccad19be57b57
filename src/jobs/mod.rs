//! Watchlist evaluation and notification dispatch

pub mod context;
pub mod handlers;

pub use context::JobContext;
pub use handlers::{
    analyze_symbol, check_market, evaluate_watchlist, send_alerts, send_daily_report,
    send_market_alert, AlertOutcome, MarketCheck,
};
