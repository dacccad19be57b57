//! Score bands and their recommendation labels.

use crate::config::ScoreThresholds;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Recommendation {
    StrongBuy,
    ModerateBuy,
    WeakBuy,
    Hold,
}

impl Recommendation {
    /// Band for `score`; the same thresholds drive alerts and the daily report.
    pub fn from_score(score: u32, thresholds: &ScoreThresholds) -> Self {
        if score >= thresholds.strong {
            Recommendation::StrongBuy
        } else if score >= thresholds.moderate {
            Recommendation::ModerateBuy
        } else if score >= thresholds.weak {
            Recommendation::WeakBuy
        } else {
            Recommendation::Hold
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::ModerateBuy => "MODERATE BUY",
            Recommendation::WeakBuy => "WEAK BUY",
            Recommendation::Hold => "HOLD",
        }
    }

    /// Longer label used on the console.
    pub fn description(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::ModerateBuy => "MODERATE BUY",
            Recommendation::WeakBuy => "WEAK BUY / VALUE ENTRY",
            Recommendation::Hold => "HOLD / NO ACTION",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "🎯",
            Recommendation::ModerateBuy => "✅",
            Recommendation::WeakBuy => "💡",
            Recommendation::Hold => "❌",
        }
    }
}
