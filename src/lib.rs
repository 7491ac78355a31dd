//! Countdown Board - a headless multi-timer countdown service
//!
//! This library manages any number of independent countdown timers. Each timer
//! ticks once per second on its own schedule and moves through the
//! stopped / running / paused / finished / reset lifecycle. Every change is
//! published as a [`TimerEvent`] so a presentation layer can re-render without
//! the core ever touching display code.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{TimerController, TimerEvent, TimerId, TimerService, TimerState, TimerStatus};
pub use tasks::{tick_pump_task, TickPolicy};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
