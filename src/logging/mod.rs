//! Logging initialization with environment-based formatters
//!
//! - Production (or `LOG_FORMAT=json`): structured JSON logs
//! - Anything else: colourful, human-readable logs

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn wants_json(environment: &str, log_format: Option<&str>) -> bool {
    match log_format.map(|f| f.trim().to_ascii_lowercase()) {
        Some(format) if format == "json" => true,
        Some(format) if format == "pretty" || format == "text" => false,
        _ => matches!(environment, "production" | "prod"),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").ok();

    if wants_json(&get_environment(), log_format.as_deref()) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    }
}
