//! External collaborators: market data source and notification channel.

pub mod market_data;
pub mod notifier;
pub mod telegram;
pub mod yahoo;

pub use market_data::{FetchError, MarketDataProvider};
pub use notifier::{LogNotifier, Notifier, NotifyError};
