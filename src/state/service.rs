//! Shared handle that serializes every command and tick

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use crate::{
    error::{Result, TimerError},
    tasks::{Tick, TickPolicy, TickScheduler},
};
use super::{BatchReport, TimerController, TimerEvent, TimerId, TimerState};

/// Cloneable front door to the [`TimerController`].
///
/// The controller sits behind one mutex; API handlers and the tick pump both
/// go through it, so a tick can never interleave with a command.
#[derive(Debug, Clone)]
pub struct TimerService {
    controller: Arc<Mutex<TimerController>>,
    events_tx: broadcast::Sender<TimerEvent>,
    start_time: Instant,
}

impl TimerService {
    /// Create a service driven by tokio timers.
    ///
    /// The returned receiver must be handed to
    /// [`tick_pump_task`](crate::tasks::tick_pump_task) for ticks to apply.
    pub fn new(policy: TickPolicy, event_buffer: usize) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let scheduler = TickScheduler::new(tick_tx, policy);
        info!("Creating timer service (tick policy: {:?})", scheduler.policy());
        (
            Self::from_controller(TimerController::new(scheduler, event_buffer)),
            tick_rx,
        )
    }

    /// Create a service whose ticks are injected through [`Self::tick`]
    pub fn manual(event_buffer: usize) -> Self {
        Self::from_controller(TimerController::manual(event_buffer))
    }

    pub fn from_controller(controller: TimerController) -> Self {
        Self {
            events_tx: controller.event_sender(),
            controller: Arc::new(Mutex::new(controller)),
            start_time: Instant::now(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimerController>> {
        self.controller
            .lock()
            .map_err(|e| TimerError::Unavailable(format!("Failed to lock timer controller: {}", e)))
    }

    /// Subscribe to the notification stream
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    pub fn all(&self) -> Result<Vec<TimerState>> {
        Ok(self.lock()?.all())
    }

    pub fn get(&self, id: TimerId) -> Result<TimerState> {
        self.lock()?.get(id)
    }

    pub fn running_count(&self) -> Result<usize> {
        Ok(self.lock()?.running_count())
    }

    pub fn add(&self, name: &str, duration_seconds: i64) -> Result<TimerState> {
        self.lock()?.add(name, duration_seconds)
    }

    pub fn start(&self, id: TimerId) -> Result<TimerState> {
        self.lock()?.start(id)
    }

    pub fn pause(&self, id: TimerId) -> Result<TimerState> {
        self.lock()?.pause(id)
    }

    pub fn reset(&self, id: TimerId) -> Result<TimerState> {
        self.lock()?.reset(id)
    }

    pub fn remove(&self, id: TimerId) -> Result<TimerState> {
        self.lock()?.remove(id)
    }

    pub fn start_all(&self) -> Result<BatchReport> {
        Ok(self.lock()?.start_all())
    }

    pub fn pause_all(&self) -> Result<BatchReport> {
        Ok(self.lock()?.pause_all())
    }

    pub fn reset_all(&self) -> Result<BatchReport> {
        Ok(self.lock()?.reset_all())
    }

    /// Apply one elapsed second to `id` directly
    pub fn tick(&self, id: TimerId) -> Result<TimerState> {
        self.lock()?.tick(id)
    }

    /// Apply a tick produced by the scheduler
    pub fn deliver(&self, tick: Tick) -> Result<TimerState> {
        self.lock()?.deliver(tick)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
