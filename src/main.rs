//! Countdown Board - a headless multi-timer countdown service
//!
//! This is the main entry point for the countdown-board server.

use tokio::net::TcpListener;
use tracing::info;

use countdown_board::{
    api::create_router,
    config::Config,
    state::TimerService,
    tasks::tick_pump_task,
    utils::{pause_timers_on_shutdown, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_board={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-board server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick_policy={:?}, event_buffer={}",
          config.host, config.port, config.tick_policy, config.event_buffer);

    // Create the timer service and the pump that applies its ticks
    let (service, tick_rx) = TimerService::new(config.tick_policy, config.event_buffer);
    tokio::spawn(tick_pump_task(service.clone(), tick_rx));

    // Create HTTP router with all endpoints
    let app = create_router(service.clone());

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers            - List timers");
    info!("  POST   /timers            - Add a timer");
    info!("  GET    /timers/:id        - Show one timer");
    info!("  DELETE /timers/:id        - Remove a timer");
    info!("  POST   /timers/:id/start  - Start or resume");
    info!("  POST   /timers/:id/pause  - Pause");
    info!("  POST   /timers/:id/reset  - Reset to full duration");
    info!("  POST   /timers/start-all | pause-all | reset-all");
    info!("  GET    /events            - Server-sent notifications");
    info!("  GET    /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    pause_timers_on_shutdown(&service);
    info!("Server shutdown complete");
    Ok(())
}
