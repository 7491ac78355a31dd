//! Utility functions module
//!
//! Process-level helpers used by the binary.

pub mod signals;

// Re-export main functions
pub use signals::{pause_timers_on_shutdown, shutdown_signal};
