//! Prometheus metrics for the monitor and its HTTP surface.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,

    pub evaluations_total: IntCounter,
    pub symbols_skipped_total: IntCounter,
    pub alerts_sent_total: IntCounter,
    pub notifications_failed_total: IntCounter,
    pub reports_sent_total: IntCounter,
    pub market_alerts_sent_total: IntCounter,
    pub evaluation_duration_seconds: Histogram,
    pub market_open: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            Gauge::new("http_requests_in_flight", "HTTP requests currently being served")?;

        let evaluations_total = IntCounter::new(
            "evaluations_total",
            "Symbols analysed successfully",
        )?;
        let symbols_skipped_total = IntCounter::new(
            "symbols_skipped_total",
            "Symbols skipped because market data was unavailable",
        )?;
        let alerts_sent_total = IntCounter::new("alerts_sent_total", "Alerts delivered")?;
        let notifications_failed_total = IntCounter::new(
            "notifications_failed_total",
            "Alert or report deliveries that failed",
        )?;
        let reports_sent_total =
            IntCounter::new("reports_sent_total", "Daily reports delivered")?;
        let market_alerts_sent_total = IntCounter::new(
            "market_alerts_sent_total",
            "Broad-market downturn alerts delivered",
        )?;
        let evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "evaluation_duration_seconds",
                "Wall time of one watchlist evaluation",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        let market_open = Gauge::new("market_open", "1 while the market session is open")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(symbols_skipped_total.clone()))?;
        registry.register(Box::new(alerts_sent_total.clone()))?;
        registry.register(Box::new(notifications_failed_total.clone()))?;
        registry.register(Box::new(reports_sent_total.clone()))?;
        registry.register(Box::new(market_alerts_sent_total.clone()))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(market_open.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            evaluations_total,
            symbols_skipped_total,
            alerts_sent_total,
            notifications_failed_total,
            reports_sent_total,
            market_alerts_sent_total,
            evaluation_duration_seconds,
            market_open,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
