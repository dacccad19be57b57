use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

use super::{escape_html, DISCLAIMER};
use crate::config::MarketWatchSettings;
use crate::models::{IndexQuote, MarketSnapshot};
use crate::signals::{MarketAlerts, MarketCondition, MarketSentiment};

fn condition_emoji(condition: MarketCondition) -> &'static str {
    match condition {
        MarketCondition::SharpDrop => "🚨",
        MarketCondition::BroadDecline => "📉",
        MarketCondition::GapDown => "⚡",
    }
}

fn index_line(msg: &mut String, name: &str, quote: &IndexQuote) {
    let _ = writeln!(
        msg,
        "{}: {:.2} ({:+.2}%)",
        escape_html(name),
        quote.price,
        quote.change_percent()
    );
}

/// Broad-market downturn alert with both index levels and the triggered rules.
pub fn format_market_alert(
    snapshot: &MarketSnapshot,
    alerts: &MarketAlerts,
    settings: &MarketWatchSettings,
    generated_at: DateTime<Utc>,
    tz: Tz,
) -> String {
    let local = generated_at.with_timezone(&tz);
    let sentiment = MarketSentiment::from_alerts(alerts);

    let mut msg = String::new();
    msg.push_str("📉 <b>MARKET ALERT</b>\n");
    let _ = writeln!(msg, "⏰ {} {}", local.format("%Y-%m-%d %H:%M"), local.format("%Z"));
    msg.push('\n');
    msg.push_str("<b>Market Status:</b>\n");
    index_line(&mut msg, &settings.benchmark.name, &snapshot.benchmark);
    index_line(&mut msg, &settings.secondary.name, &snapshot.secondary);
    msg.push('\n');
    msg.push_str("🚨 <b>Alerts:</b>\n");
    for (condition, description) in alerts {
        let _ = writeln!(msg, "• {} {}", condition_emoji(*condition), escape_html(description));
    }
    let badge = match sentiment {
        MarketSentiment::Bearish => "🔴",
        MarketSentiment::Normal => "🟢",
    };
    let _ = writeln!(
        msg,
        "\n<b>Overall Market Sentiment:</b> {badge} {}",
        sentiment.label()
    );
    let _ = write!(msg, "\n⚠️ <i>{DISCLAIMER}</i>");
    msg
}
