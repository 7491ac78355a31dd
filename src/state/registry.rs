//! Single-owner store of every timer, iterated in insertion order

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Result, TimerError};
use super::{TimerId, TimerState, TimerStatus};

/// Collection of timers keyed by id.
///
/// Ids are allocated from a monotonically increasing counter, so ordering the
/// map by id is the same as ordering it by insertion.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: BTreeMap<TimerId, TimerState>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new stopped timer and return its id.
    ///
    /// An empty name becomes `Timer N`, where N is the current count plus one.
    pub fn add(&mut self, name: &str, full_duration_seconds: i64) -> Result<TimerId> {
        if full_duration_seconds < 0 {
            return Err(TimerError::InvalidDuration(full_duration_seconds));
        }

        let name = if name.trim().is_empty() {
            format!("Timer {}", self.timers.len() + 1)
        } else {
            name.to_string()
        };

        let id = TimerId::next();
        debug!("Registering timer {} ({:?}, {}s)", id, name, full_duration_seconds);
        self.timers
            .insert(id, TimerState::new(id, name, full_duration_seconds as u64));
        Ok(id)
    }

    pub fn get(&self, id: TimerId) -> Result<&TimerState> {
        self.timers.get(&id).ok_or(TimerError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: TimerId) -> Result<&mut TimerState> {
        self.timers.get_mut(&id).ok_or(TimerError::NotFound(id))
    }

    /// Delete an entry. Its tick subscription must already be cancelled.
    pub fn remove(&mut self, id: TimerId) -> Result<TimerState> {
        self.timers.remove(&id).ok_or(TimerError::NotFound(id))
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// All timers in insertion order
    pub fn all(&self) -> impl Iterator<Item = &TimerState> {
        self.timers.values()
    }

    /// Snapshot of ids in insertion order, safe to hold across mutations
    pub fn ids(&self) -> Vec<TimerId> {
        self.timers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Number of timers currently counting down
    pub fn running_count(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| timer.status == TimerStatus::Running)
            .count()
    }
}
