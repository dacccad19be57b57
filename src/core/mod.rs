//! Runtime primitives: time source, monitoring loop, HTTP surface

pub mod clock;
pub mod http;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use http::{create_router, start_server, AppState};
pub use scheduler::{MonitorLoop, Phase, SchedulerState};
