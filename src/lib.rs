//! Technical-analysis signal scoring for an equity watchlist.

pub mod calendar;
pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;
pub mod signals;
