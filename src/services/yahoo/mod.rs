//! Yahoo Finance chart API client

pub mod provider;
pub mod response;

pub use provider::{YahooChartProvider, DEFAULT_BASE_URL};
