// src/monitor/mod.rs
pub mod clock;
pub mod detector;
pub mod scheduler;
pub mod window;

pub use clock::{Clock, SystemClock};
pub use detector::{ChangeDetector, DetectorSettings};
pub use scheduler::{Scheduler, SchedulerSettings, SchedulerState, TickOutcome, TickSummary};
pub use window::WindowStore;
