//! Timer state management
//!
//! Data model, the single-owner registry, the lifecycle controller and the
//! shared service handle that serializes access to it.

pub mod timer_state;
pub mod registry;
pub mod events;
pub mod controller;
pub mod service;

// Re-export main types
pub use timer_state::{format_seconds, TimerId, TimerState, TimerStatus};
pub use registry::TimerRegistry;
pub use events::TimerEvent;
pub use controller::{BatchReport, SkippedTimer, TimerController};
pub use service::TimerService;
