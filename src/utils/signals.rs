//! Signal handling for graceful shutdown

use futures::{future, stream::StreamExt};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{error, info, warn};

use crate::state::TimerService;

/// Wait for SIGTERM or SIGINT.
///
/// If the handler cannot be installed the error is logged and this never
/// resolves, leaving the server running.
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to install signal handler: {}", e);
            return future::pending().await;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Pause every timer so no ticker task outlives the server
pub fn pause_timers_on_shutdown(service: &TimerService) {
    match service.pause_all() {
        Ok(report) => info!("Paused {} timers before shutdown", report.timers.len()),
        Err(e) => warn!("Failed to pause timers on shutdown: {}", e),
    }
}
