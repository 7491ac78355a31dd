//! Lifecycle state machine for every registered timer

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    error::{Result, TimerError},
    tasks::{Tick, TickScheduler},
};
use super::{TimerEvent, TimerId, TimerRegistry, TimerState, TimerStatus};

/// A timer a batch operation could not apply to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTimer {
    pub id: TimerId,
    pub reason: String,
}

/// Outcome of a batch operation, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub timers: Vec<TimerState>,
    pub skipped: Vec<SkippedTimer>,
}

/// Owns the registry and the scheduler, and is the only place timer state is
/// mutated. Every change is broadcast as a [`TimerEvent`].
#[derive(Debug)]
pub struct TimerController {
    registry: TimerRegistry,
    scheduler: TickScheduler,
    events_tx: broadcast::Sender<TimerEvent>,
}

impl TimerController {
    pub fn new(scheduler: TickScheduler, event_buffer: usize) -> Self {
        let (events_tx, _) = broadcast::channel(event_buffer.max(1));
        Self {
            registry: TimerRegistry::new(),
            scheduler,
            events_tx,
        }
    }

    /// Controller whose ticks are injected by the caller via [`Self::tick`]
    pub fn manual(event_buffer: usize) -> Self {
        Self::new(TickScheduler::manual(), event_buffer)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    pub fn event_sender(&self) -> broadcast::Sender<TimerEvent> {
        self.events_tx.clone()
    }

    pub fn all(&self) -> Vec<TimerState> {
        self.registry.all().cloned().collect()
    }

    pub fn get(&self, id: TimerId) -> Result<TimerState> {
        self.registry.get(id).cloned()
    }

    pub fn running_count(&self) -> usize {
        self.registry.running_count()
    }

    pub fn is_ticking(&self, id: TimerId) -> bool {
        self.scheduler.is_active(id)
    }

    pub fn add(&mut self, name: &str, duration_seconds: i64) -> Result<TimerState> {
        let id = self.registry.add(name, duration_seconds)?;
        let state = self.registry.get(id)?.clone();
        info!("Added timer {} ({:?}, {}s)", id, state.name, state.full_duration_seconds);
        Ok(self.updated(state))
    }

    /// Begin or resume counting down. Starting a running timer changes nothing.
    pub fn start(&mut self, id: TimerId) -> Result<TimerState> {
        let timer = self.registry.get_mut(id)?;

        if timer.is_running() {
            return Ok(timer.clone());
        }
        if timer.seconds_left == 0 {
            debug!("Ignoring start for timer {}: no time left", id);
            return Err(TimerError::InvalidTransition {
                id,
                reason: "no time left",
            });
        }
        if !timer.status.can_start() {
            return Err(TimerError::InvalidTransition {
                id,
                reason: "timer is not startable",
            });
        }

        self.scheduler.activate(id);
        timer.set_status(TimerStatus::Running);
        let state = timer.clone();
        info!("Started timer {} with {}s left", id, state.seconds_left);
        Ok(self.updated(state))
    }

    /// Stop ticking and keep the remaining time
    pub fn pause(&mut self, id: TimerId) -> Result<TimerState> {
        let timer = self.registry.get_mut(id)?;
        self.scheduler.deactivate(id);

        if timer.status == TimerStatus::Paused {
            return Ok(timer.clone());
        }

        timer.set_status(TimerStatus::Paused);
        let state = timer.clone();
        info!("Paused timer {} with {}s left", id, state.seconds_left);
        Ok(self.updated(state))
    }

    /// Stop ticking and restore the full duration
    pub fn reset(&mut self, id: TimerId) -> Result<TimerState> {
        let timer = self.registry.get_mut(id)?;
        self.scheduler.deactivate(id);

        if timer.status == TimerStatus::Reset && timer.seconds_left == timer.full_duration_seconds {
            return Ok(timer.clone());
        }

        timer.rewind();
        timer.set_status(TimerStatus::Reset);
        let state = timer.clone();
        info!("Reset timer {} to {}s", id, state.seconds_left);
        Ok(self.updated(state))
    }

    /// Cancel ticking and drop the timer. Returns its last state.
    pub fn remove(&mut self, id: TimerId) -> Result<TimerState> {
        if !self.registry.contains(id) {
            return Err(TimerError::NotFound(id));
        }

        self.scheduler.deactivate(id);
        let state = self.registry.remove(id)?;
        info!("Removed timer {} ({:?})", id, state.name);
        self.publish(TimerEvent::Removed { id });
        Ok(state)
    }

    /// Apply one elapsed second. Ticks for timers that are not running are
    /// ignored.
    pub fn tick(&mut self, id: TimerId) -> Result<TimerState> {
        let timer = self.registry.get_mut(id)?;

        if !timer.is_running() {
            debug!("Ignoring late tick for timer {} ({})", id, timer.status);
            return Ok(timer.clone());
        }

        if timer.decrement() {
            return self.finish(id);
        }

        let state = timer.clone();
        Ok(self.updated(state))
    }

    /// Apply a tick from the scheduler, dropping it if its subscription has
    /// since been cancelled or replaced.
    pub fn deliver(&mut self, tick: Tick) -> Result<TimerState> {
        if !self.scheduler.accepts(tick) {
            let state = self.registry.get(tick.id)?;
            debug!(
                "Dropping stale tick for timer {} (generation {})",
                tick.id, tick.generation
            );
            return Ok(state.clone());
        }
        self.tick(tick.id)
    }

    fn finish(&mut self, id: TimerId) -> Result<TimerState> {
        self.scheduler.deactivate(id);
        let timer = self.registry.get_mut(id)?;
        timer.set_status(TimerStatus::Finished);
        let state = timer.clone();

        info!("Timer {} ({:?}) finished", id, state.name);
        self.publish(TimerEvent::Finished {
            id,
            name: state.name.clone(),
            state: state.clone(),
        });
        Ok(state)
    }

    pub fn start_all(&mut self) -> BatchReport {
        self.apply_all("start", Self::start)
    }

    pub fn pause_all(&mut self) -> BatchReport {
        self.apply_all("pause", Self::pause)
    }

    pub fn reset_all(&mut self) -> BatchReport {
        self.apply_all("reset", Self::reset)
    }

    fn apply_all<F>(&mut self, action: &str, mut op: F) -> BatchReport
    where
        F: FnMut(&mut Self, TimerId) -> Result<TimerState>,
    {
        let mut report = BatchReport::default();

        for id in self.registry.ids() {
            match op(self, id) {
                Ok(state) => report.timers.push(state),
                Err(e) => {
                    debug!("Batch {} skipped timer {}: {}", action, id, e);
                    report.skipped.push(SkippedTimer {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch {} applied to {} timers, skipped {}",
            action,
            report.timers.len(),
            report.skipped.len()
        );
        report
    }

    fn updated(&self, state: TimerState) -> TimerState {
        self.publish(TimerEvent::Updated {
            id: state.id,
            state: state.clone(),
        });
        state
    }

    fn publish(&self, event: TimerEvent) {
        // Sending only fails when nobody is subscribed
        if self.events_tx.send(event).is_err() {
            debug!("No subscribers for timer notifications");
        }
    }
}
