use std::fmt::Write;

use super::{escape_html, fmt_price, fmt_value, DISCLAIMER};
use crate::config::ScoreThresholds;
use crate::models::AnalysisResult;
use crate::signals::Recommendation;

/// Per-symbol alert, sent when a score reaches the alert threshold.
pub fn format_alert(result: &AnalysisResult, name: &str, thresholds: &ScoreThresholds) -> String {
    let recommendation = Recommendation::from_score(result.score, thresholds);
    let emoji = if recommendation == Recommendation::StrongBuy {
        "🎯"
    } else {
        "✅"
    };

    let mut msg = String::new();
    let _ = writeln!(msg, "{emoji} <b>STOCK ALERT: {}</b>", escape_html(name));
    msg.push('\n');
    let _ = writeln!(msg, "📊 <b>Signal Score:</b> {}/100", result.score);
    let _ = writeln!(msg, "💰 <b>Current Price:</b> ₹{:.2}", result.price);
    let _ = writeln!(msg, "📅 <b>Date:</b> {}", result.date);
    msg.push('\n');
    let _ = writeln!(msg, "🎯 <b>Recommendation:</b> {}", recommendation.label());
    msg.push('\n');
    msg.push_str("📈 <b>Key Indicators:</b>\n");
    let _ = writeln!(msg, "• RSI: {}", fmt_value(result.rsi, 2));
    let _ = writeln!(msg, "• MACD: {}", fmt_value(result.macd, 4));
    let _ = writeln!(msg, "• 20-day SMA: {}", fmt_price(result.sma_20));
    let _ = writeln!(msg, "• 50-day SMA: {}", fmt_price(result.sma_50));
    msg.push('\n');
    msg.push_str("✅ <b>Active Signals:</b>\n");
    if result.signals.is_empty() {
        msg.push_str("• No active signals\n");
    } else {
        for description in result.signals.values() {
            let _ = writeln!(msg, "• {}", escape_html(description));
        }
    }
    let _ = write!(msg, "\n⚠️ <i>{DISCLAIMER}</i>");
    msg
}
