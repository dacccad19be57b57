//! Message rendering for alerts, the daily report and console output.

pub mod alert;
pub mod console;
pub mod daily;
pub mod market;

pub use alert::format_alert;
pub use console::{format_analysis, format_legend};
pub use daily::{format_daily_report, BandSummary};
pub use market::format_market_alert;

pub const DISCLAIMER: &str = "This is technical analysis only. Do your own research.";

/// Drop the HTML tags used in messages and decode the few entities we emit.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Escape user supplied text (symbol names) for HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn fmt_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

pub(crate) fn fmt_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("₹{v:.2}"),
        None => "n/a".to_string(),
    }
}
