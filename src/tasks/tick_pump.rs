//! Tick pump background task

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    error::TimerError,
    state::TimerService,
    tasks::Tick,
};

/// Background task that feeds scheduler ticks into the service, one at a time
pub async fn tick_pump_task(service: TimerService, mut tick_rx: mpsc::UnboundedReceiver<Tick>) {
    info!("Starting tick pump task");

    while let Some(tick) = tick_rx.recv().await {
        match service.deliver(tick) {
            Ok(_) => {}
            Err(TimerError::NotFound(id)) => {
                debug!("Dropping tick for removed timer {}", id);
            }
            Err(e) => {
                error!("Failed to apply tick for timer {}: {}", tick.id, e);
            }
        }
    }

    info!("Tick channel closed, stopping tick pump");
}
