//! Broad-market downturn conditions on the benchmark indices.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::MarketWatchSettings;
use crate::models::MarketSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCondition {
    /// Benchmark down more than the sharp-drop threshold on the day.
    SharpDrop,
    /// Both indices below their previous close.
    BroadDecline,
    /// Benchmark down more than the gap-down threshold.
    GapDown,
}

/// Triggered conditions mapped to their descriptions.
pub type MarketAlerts = BTreeMap<MarketCondition, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketSentiment {
    Bearish,
    Normal,
}

impl MarketSentiment {
    pub fn from_alerts(alerts: &MarketAlerts) -> Self {
        if alerts.is_empty() {
            MarketSentiment::Normal
        } else {
            MarketSentiment::Bearish
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketSentiment::Bearish => "BEARISH",
            MarketSentiment::Normal => "NORMAL",
        }
    }
}

/// Evaluate every downturn rule; they are independent and may all fire.
pub fn check_market_conditions(
    snapshot: &MarketSnapshot,
    settings: &MarketWatchSettings,
) -> MarketAlerts {
    let mut alerts = MarketAlerts::new();
    let benchmark = snapshot.benchmark.change_percent();
    let secondary = snapshot.secondary.change_percent();
    let benchmark_name = &settings.benchmark.name;

    if benchmark < -settings.sharp_drop_pct {
        alerts.insert(
            MarketCondition::SharpDrop,
            format!(
                "{benchmark_name} down {benchmark:.2}% (more than {}%)",
                settings.sharp_drop_pct
            ),
        );
    }

    if benchmark < 0.0 && secondary < 0.0 {
        alerts.insert(
            MarketCondition::BroadDecline,
            format!(
                "Both indices in red: {benchmark_name} {benchmark:.2}%, {} {secondary:.2}%",
                settings.secondary.name
            ),
        );
    }

    if benchmark < -settings.gap_down_pct {
        alerts.insert(
            MarketCondition::GapDown,
            format!("Market gap down: {benchmark_name} {benchmark:.2}%"),
        );
    }

    alerts
}
