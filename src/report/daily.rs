use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

use super::{escape_html, fmt_price, fmt_value, DISCLAIMER};
use crate::config::{Config, ScoreThresholds};
use crate::models::AnalysisResult;
use crate::signals::Recommendation;

const RULE: &str = "==================================================";

/// Count of results per recommendation band.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BandSummary {
    pub strong: usize,
    pub moderate: usize,
    pub weak: usize,
    pub hold: usize,
}

impl BandSummary {
    pub fn from_results(results: &[AnalysisResult], thresholds: &ScoreThresholds) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match Recommendation::from_score(r.score, thresholds) {
                Recommendation::StrongBuy => acc.strong += 1,
                Recommendation::ModerateBuy => acc.moderate += 1,
                Recommendation::WeakBuy => acc.weak += 1,
                Recommendation::Hold => acc.hold += 1,
            }
            acc
        })
    }
}

/// Whole-watchlist report, highest score first. `None` when there is nothing to report.
pub fn format_daily_report(
    results: &[AnalysisResult],
    config: &Config,
    generated_at: DateTime<Utc>,
) -> Option<String> {
    if results.is_empty() {
        return None;
    }
    let thresholds = &config.thresholds;
    let tz: Tz = config.trading_hours.timezone;

    let mut sorted: Vec<&AnalysisResult> = results.iter().collect();
    // stable: equal scores keep watchlist order
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    let summary = BandSummary::from_results(results, thresholds);
    let local = generated_at.with_timezone(&tz);

    let mut msg = String::new();
    msg.push_str("📊 <b>DAILY STOCK MARKET REPORT</b>\n");
    let _ = writeln!(
        msg,
        "📅 <b>Date:</b> {} {}",
        local.format("%Y-%m-%d %H:%M"),
        local.format("%Z")
    );
    let _ = writeln!(msg, "\n{RULE}\n");
    msg.push_str("📈 <b>MARKET SUMMARY:</b>\n");
    let _ = writeln!(msg, "🎯 Strong Buy: {} stocks", summary.strong);
    let _ = writeln!(msg, "✅ Moderate Buy: {} stocks", summary.moderate);
    let _ = writeln!(msg, "💡 Weak Buy: {} stocks", summary.weak);
    let _ = writeln!(msg, "❌ Hold: {} stocks", summary.hold);
    let _ = writeln!(msg, "\n{RULE}\n");

    for result in sorted {
        let recommendation = Recommendation::from_score(result.score, thresholds);
        let name = config.display_name(&result.symbol);
        let _ = writeln!(
            msg,
            "{} <b>{}</b> ({})",
            recommendation.emoji(),
            escape_html(name),
            escape_html(&result.symbol)
        );
        let _ = writeln!(
            msg,
            "💰 Price: ₹{:.2} | 📊 Score: {}/100",
            result.price, result.score
        );
        let _ = writeln!(msg, "🎯 <b>{}</b>", recommendation.label());
        msg.push_str("\n📈 <b>Indicators:</b>\n");
        let _ = writeln!(msg, "• RSI: {}", fmt_value(result.rsi, 2));
        let _ = writeln!(msg, "• MACD: {}", fmt_value(result.macd, 4));
        let _ = writeln!(msg, "• 20SMA: {}", fmt_price(result.sma_20));
        let _ = writeln!(msg, "• 50SMA: {}", fmt_price(result.sma_50));
        msg.push('\n');
        if result.signals.is_empty() {
            msg.push_str("• No active signals\n");
        } else {
            msg.push_str("✅ <b>Signals:</b>\n");
            for description in result.signals.values() {
                let _ = writeln!(msg, "• {}", escape_html(description));
            }
        }
        msg.push('\n');
    }

    let _ = writeln!(msg, "{RULE}\n");
    let _ = write!(msg, "⚠️ <i>{DISCLAIMER}</i>");
    Some(msg)
}
