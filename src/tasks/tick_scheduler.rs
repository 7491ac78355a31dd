//! Per-timer one-second tick subscriptions

use std::{collections::HashMap, time::Duration};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, trace};

use crate::state::TimerId;

/// Default spacing between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed period for one timer.
///
/// `generation` identifies the activation that produced the tick, so ticks
/// emitted before a deactivation can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub id: TimerId,
    pub generation: u64,
}

/// How a ticker catches up after the runtime stalls past a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Deadlines stay anchored to the activation instant; missed ticks are
    /// delivered back to back so the countdown tracks wall-clock time.
    #[default]
    Deadline,
    /// The schedule slides forward after a stall; missed ticks are lost.
    Fixed,
}

impl TickPolicy {
    fn missed_tick_behavior(self) -> MissedTickBehavior {
        match self {
            Self::Deadline => MissedTickBehavior::Burst,
            Self::Fixed => MissedTickBehavior::Delay,
        }
    }
}

#[derive(Debug)]
struct Subscription {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// Tracks which timers are ticking and owns the tasks that drive them.
///
/// Every active id has its own cadence, so pausing one timer never shifts
/// another's schedule. Ticks from all tasks are funnelled into one channel.
#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    policy: TickPolicy,
    tick_tx: Option<mpsc::UnboundedSender<Tick>>,
    subscriptions: HashMap<TimerId, Subscription>,
    next_generation: u64,
}

impl TickScheduler {
    /// Scheduler backed by tokio timers, delivering ticks into `tick_tx`
    pub fn new(tick_tx: mpsc::UnboundedSender<Tick>, policy: TickPolicy) -> Self {
        Self {
            period: TICK_PERIOD,
            policy,
            tick_tx: Some(tick_tx),
            subscriptions: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Scheduler without a timing source; ticks are injected by the caller
    pub fn manual() -> Self {
        Self {
            period: TICK_PERIOD,
            policy: TickPolicy::default(),
            tick_tx: None,
            subscriptions: HashMap::new(),
            next_generation: 1,
        }
    }

    pub fn policy(&self) -> TickPolicy {
        self.policy
    }

    /// Begin ticking `id`. Returns false if it was already active.
    pub fn activate(&mut self, id: TimerId) -> bool {
        if self.subscriptions.contains_key(&id) {
            trace!("Timer {} already ticking", id);
            return false;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let task = self.tick_tx.clone().map(|tx| {
            // Anchor before spawning so the first deadline does not depend on
            // when the task is first polled.
            let first_deadline = Instant::now() + self.period;
            tokio::spawn(run_ticker(
                Tick { id, generation },
                first_deadline,
                self.period,
                self.policy,
                tx,
            ))
        });

        debug!("Activated ticking for timer {} (generation {})", id, generation);
        self.subscriptions.insert(id, Subscription { generation, task });
        true
    }

    /// Stop ticking `id`. Returns false if it was not active.
    pub fn deactivate(&mut self, id: TimerId) -> bool {
        match self.subscriptions.remove(&id) {
            Some(subscription) => {
                if let Some(task) = subscription.task {
                    task.abort();
                }
                debug!(
                    "Deactivated ticking for timer {} (generation {})",
                    id, subscription.generation
                );
                true
            }
            None => false,
        }
    }

    /// Cancel every subscription
    pub fn deactivate_all(&mut self) {
        for (_, subscription) in self.subscriptions.drain() {
            if let Some(task) = subscription.task {
                task.abort();
            }
        }
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Generation of the current subscription for `id`, if any
    pub fn generation(&self, id: TimerId) -> Option<u64> {
        self.subscriptions.get(&id).map(|s| s.generation)
    }

    /// Whether `tick` belongs to the live subscription of its timer
    pub fn accepts(&self, tick: Tick) -> bool {
        self.generation(tick.id) == Some(tick.generation)
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.deactivate_all();
    }
}

async fn run_ticker(
    tick: Tick,
    first_deadline: Instant,
    period: Duration,
    policy: TickPolicy,
    tx: mpsc::UnboundedSender<Tick>,
) {
    let mut interval = time::interval_at(first_deadline, period);
    interval.set_missed_tick_behavior(policy.missed_tick_behavior());

    loop {
        interval.tick().await;
        if tx.send(tick).is_err() {
            debug!("Tick receiver dropped, stopping ticker for timer {}", tick.id);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(10),
            "elapsed {:?}, expected about {:?}",
            elapsed,
            expected
        );
    }

    #[test]
    fn manual_activation_is_idempotent() {
        let mut scheduler = TickScheduler::manual();
        let id = TimerId::next();

        assert!(scheduler.activate(id));
        let generation = scheduler.generation(id);
        assert!(!scheduler.activate(id));
        assert_eq!(scheduler.generation(id), generation);
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut scheduler = TickScheduler::manual();
        let id = TimerId::next();

        scheduler.activate(id);
        assert!(scheduler.deactivate(id));
        assert!(!scheduler.deactivate(id));
        assert!(!scheduler.is_active(id));
    }

    #[test]
    fn stale_generation_is_rejected() {
        let mut scheduler = TickScheduler::manual();
        let id = TimerId::next();

        scheduler.activate(id);
        let old = Tick {
            id,
            generation: scheduler.generation(id).unwrap(),
        };
        scheduler.deactivate(id);
        assert!(!scheduler.accepts(old));

        scheduler.activate(id);
        let current = Tick {
            id,
            generation: scheduler.generation(id).unwrap(),
        };
        assert!(!scheduler.accepts(old));
        assert!(scheduler.accepts(current));
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_one_tick_per_second() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx, TickPolicy::Deadline);
        let id = TimerId::next();
        let started = Instant::now();

        scheduler.activate(id);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.id, id);
        assert!(scheduler.accepts(first));
        assert_close(started.elapsed(), Duration::from_secs(1));

        rx.recv().await.unwrap();
        assert_close(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_deactivate() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx, TickPolicy::Deadline);
        let id = TimerId::next();

        scheduler.activate(id);
        rx.recv().await.unwrap();
        scheduler.deactivate(id);

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn timers_tick_independently() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TickScheduler::new(tx, TickPolicy::Fixed);
        let a = TimerId::next();
        let b = TimerId::next();

        scheduler.activate(a);
        time::sleep(Duration::from_millis(500)).await;
        scheduler.activate(b);

        assert_eq!(rx.recv().await.unwrap().id, a);
        assert_eq!(rx.recv().await.unwrap().id, b);

        scheduler.deactivate(a);
        assert_eq!(rx.recv().await.unwrap().id, b);
    }
}
