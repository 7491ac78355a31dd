//! Timer state structure and lifecycle status

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use serde::{Deserialize, Serialize};

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique timer identifier. Never reused while the process lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(u64);

impl TimerId {
    /// Allocate the next identifier from the process-wide counter
    pub fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for TimerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Lifecycle status of a single timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    #[default]
    Stopped,
    Running,
    Paused,
    Finished,
    Reset,
}

impl TimerStatus {
    /// Statuses from which `start` may begin ticking
    pub fn can_start(self) -> bool {
        matches!(self, Self::Stopped | Self::Paused | Self::Reset)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Stopped => "Stopped",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
            Self::Reset => "Reset",
        };
        f.write_str(label)
    }
}

/// Snapshot of one countdown timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub id: TimerId,
    pub name: String,
    pub full_duration_seconds: u64,
    pub seconds_left: u64,
    pub status: TimerStatus,
    /// Mirrors `status == Running`
    #[serde(default)]
    pub is_running: bool,
}

impl TimerState {
    /// Create a stopped timer with its full duration remaining
    pub fn new(id: TimerId, name: String, full_duration_seconds: u64) -> Self {
        Self {
            id,
            name,
            full_duration_seconds,
            seconds_left: full_duration_seconds,
            status: TimerStatus::Stopped,
            is_running: false,
        }
    }

    /// Check if the timer is currently counting down
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Move to a new status, keeping `is_running` in step with it
    pub fn set_status(&mut self, status: TimerStatus) {
        self.status = status;
        self.is_running = status == TimerStatus::Running;
    }

    /// Remove one second. Returns true when this decrement reached zero.
    pub fn decrement(&mut self) -> bool {
        if self.seconds_left == 0 {
            return false;
        }
        self.seconds_left -= 1;
        self.seconds_left == 0
    }

    /// Restore the configured duration
    pub fn rewind(&mut self) {
        self.seconds_left = self.full_duration_seconds;
    }

    /// Remaining time as `mm:ss`
    pub fn remaining_display(&self) -> String {
        format_seconds(self.seconds_left)
    }

    /// Configured duration as `mm:ss`
    pub fn duration_display(&self) -> String {
        format_seconds(self.full_duration_seconds)
    }
}

/// Format seconds as `mm:ss`. Minutes are not wrapped into hours.
pub fn format_seconds(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
