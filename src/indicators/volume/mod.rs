//! Volume indicators

pub mod average;

pub use average::*;
