//! Background tasks module
//!
//! Per-timer tick scheduling and the pump that applies ticks to the service.

pub mod tick_scheduler;
pub mod tick_pump;

// Re-export main types and functions
pub use tick_scheduler::{Tick, TickPolicy, TickScheduler, TICK_PERIOD};
pub use tick_pump::tick_pump_task;
