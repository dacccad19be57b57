//! Signal evaluation interfaces.

pub mod engine;
pub mod market;
pub mod recommendation;
pub mod scoring;
pub mod signal_generator;

pub use engine::*;
pub use market::*;
pub use recommendation::*;
pub use scoring::*;
pub use signal_generator::*;
