use std::fmt::Write;

use super::{fmt_price, fmt_value};
use crate::config::ScoreThresholds;
use crate::models::AnalysisResult;
use crate::signals::Recommendation;

/// Plain-text block for one symbol in single-pass mode.
pub fn format_analysis(result: &AnalysisResult, name: &str, thresholds: &ScoreThresholds) -> String {
    let recommendation = Recommendation::from_score(result.score, thresholds);

    let mut out = String::new();
    let _ = writeln!(out, "{name} ({})", result.symbol);
    let _ = writeln!(out, "📅 Date: {}", result.date);
    let _ = writeln!(out, "💰 Current Price: ₹{:.2}", result.price);
    let _ = writeln!(out, "📊 Signal Strength: {}/100", result.score);
    let _ = writeln!(
        out,
        "{} RECOMMENDATION: {}",
        recommendation.emoji(),
        recommendation.description()
    );

    out.push_str("\n✅ Detected Signals:\n");
    if result.signals.is_empty() {
        out.push_str("   No active signals.\n");
    } else {
        for description in result.signals.values() {
            let _ = writeln!(out, "   • {description}");
        }
    }

    out.push_str("\n📈 Key Indicators:\n");
    let _ = writeln!(out, "   RSI: {}", fmt_value(result.rsi, 2));
    let _ = writeln!(out, "   MACD: {}", fmt_value(result.macd, 4));
    let _ = writeln!(out, "   20-day SMA: {}", fmt_price(result.sma_20));
    let _ = writeln!(out, "   50-day SMA: {}", fmt_price(result.sma_50));
    let _ = writeln!(out, "   200-day SMA: {}", fmt_price(result.sma_200));
    let _ = writeln!(out, "   Bollinger Lower Band: {}", fmt_price(result.bb_lower));
    out
}

pub fn format_legend(thresholds: &ScoreThresholds) -> String {
    let mut out = String::from("Score legend:\n");
    let _ = writeln!(out, "   🎯 {}+ : STRONG BUY", thresholds.strong);
    let _ = writeln!(out, "   ✅ {}-{} : MODERATE BUY", thresholds.moderate, thresholds.strong.saturating_sub(1));
    let _ = writeln!(out, "   💡 {}-{} : WEAK BUY / VALUE ENTRY", thresholds.weak, thresholds.moderate.saturating_sub(1));
    let _ = writeln!(out, "   ❌ below {} : HOLD / NO ACTION", thresholds.weak);
    out
}
