//! Shared data models spanning the engine layers.

pub mod bar;
pub mod indicators;
pub mod market;
pub mod signal;

pub use bar::{Bar, BarSeries, SeriesError};
pub use indicators::{IndicatorName, IndicatorRow, IndicatorSnapshot};
pub use market::{IndexQuote, MarketSnapshot};
pub use signal::{AnalysisResult, SignalKind, SignalSet};
