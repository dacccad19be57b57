//! Dependencies shared by the evaluation handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::metrics::Metrics;
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::Notifier;
use crate::signals::SignalEngine;

/// Everything one evaluation pass needs. Cheap to share behind an `Arc`.
pub struct JobContext {
    pub provider: Arc<dyn MarketDataProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub engine: SignalEngine,
    pub config: Arc<Config>,
    pub metrics: Option<Arc<Metrics>>,
}

impl JobContext {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
        config: Arc<Config>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            provider,
            notifier,
            engine: SignalEngine::from_config(&config),
            config,
            metrics,
        }
    }
}
