//! Index quotes for the broad-market checks.

use serde::Serialize;

/// Latest price of an index against the previous session close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub price: f64,
    pub previous_close: f64,
}

impl IndexQuote {
    pub fn new(symbol: impl Into<String>, price: f64, previous_close: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            previous_close,
        }
    }

    pub fn change(&self) -> f64 {
        self.price - self.previous_close
    }

    /// Day change in percent. Zero when there is no usable previous close.
    pub fn change_percent(&self) -> f64 {
        if self.previous_close <= 0.0 {
            return 0.0;
        }
        self.change() * 100.0 / self.previous_close
    }
}

/// Both benchmark quotes taken on one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub benchmark: IndexQuote,
    pub secondary: IndexQuote,
}
