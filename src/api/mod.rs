//! HTTP API module
//!
//! Thin presentation adapter: handlers forward commands to the
//! [`TimerService`] and relay its notifications. No timer state lives here.

pub mod handlers;
pub mod responses;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::TimerService;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(service: TimerService) -> Router {
    Router::new()
        .route("/timers", get(list_handler).post(add_handler))
        .route("/timers/start-all", post(start_all_handler))
        .route("/timers/pause-all", post(pause_all_handler))
        .route("/timers/reset-all", post(reset_all_handler))
        .route("/timers/:id", get(get_handler).delete(remove_handler))
        .route("/timers/:id/start", post(start_handler))
        .route("/timers/:id/pause", post(pause_handler))
        .route("/timers/:id/reset", post(reset_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}
