//! HTTP endpoint handlers

use std::convert::Infallible;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{TimerId, TimerService},
};
use super::responses::{
    AddTimerRequest, ApiError, BatchResponse, HealthResponse, TimerListResponse, TimerResponse,
};

type ApiResult<T> = Result<T, ApiError>;

fn log_rejection(action: &str, id: TimerId, err: &TimerError) {
    match err {
        TimerError::Unavailable(_) => error!("Failed to {} timer {}: {}", action, id, err),
        _ => info!("Ignored {} for timer {}: {}", action, id, err),
    }
}

/// Handle GET /timers - List every timer in display order
pub async fn list_handler(State(service): State<TimerService>) -> ApiResult<Json<TimerListResponse>> {
    let timers = service.all().map_err(|e| {
        error!("Failed to list timers: {}", e);
        e
    })?;
    Ok(Json(TimerListResponse::new(timers)))
}

/// Handle POST /timers - Register a new stopped timer
pub async fn add_handler(
    State(service): State<TimerService>,
    Json(request): Json<AddTimerRequest>,
) -> ApiResult<(StatusCode, Json<TimerResponse>)> {
    match service.add(&request.name, request.duration_seconds) {
        Ok(timer) => Ok((
            StatusCode::CREATED,
            Json(TimerResponse::ok(format!("Timer '{}' added", timer.name), timer)),
        )),
        Err(e) => {
            warn!("Rejected new timer {:?}: {}", request.name, e);
            Err(e.into())
        }
    }
}

/// Handle GET /timers/:id - Fetch one timer
pub async fn get_handler(
    State(service): State<TimerService>,
    Path(id): Path<u64>,
) -> ApiResult<Json<TimerResponse>> {
    let timer = service.get(TimerId::from(id))?;
    Ok(Json(TimerResponse::ok("Timer found".to_string(), timer)))
}

/// Handle POST /timers/:id/start - Start or resume a timer
pub async fn start_handler(
    State(service): State<TimerService>,
    Path(id): Path<u64>,
) -> ApiResult<Json<TimerResponse>> {
    let id = TimerId::from(id);
    let timer = service.start(id).map_err(|e| {
        log_rejection("start", id, &e);
        e
    })?;
    Ok(Json(TimerResponse::ok(format!("Timer {} running", id), timer)))
}

/// Handle POST /timers/:id/pause - Pause a timer
pub async fn pause_handler(
    State(service): State<TimerService>,
    Path(id): Path<u64>,
) -> ApiResult<Json<TimerResponse>> {
    let id = TimerId::from(id);
    let timer = service.pause(id).map_err(|e| {
        log_rejection("pause", id, &e);
        e
    })?;
    Ok(Json(TimerResponse::ok(format!("Timer {} is {}", id, timer.status), timer)))
}

/// Handle POST /timers/:id/reset - Restore a timer's full duration
pub async fn reset_handler(
    State(service): State<TimerService>,
    Path(id): Path<u64>,
) -> ApiResult<Json<TimerResponse>> {
    let id = TimerId::from(id);
    let timer = service.reset(id).map_err(|e| {
        log_rejection("reset", id, &e);
        e
    })?;
    Ok(Json(TimerResponse::ok(format!("Timer {} reset", id), timer)))
}

/// Handle DELETE /timers/:id - Remove a timer
pub async fn remove_handler(
    State(service): State<TimerService>,
    Path(id): Path<u64>,
) -> ApiResult<Json<TimerResponse>> {
    let id = TimerId::from(id);
    let timer = service.remove(id).map_err(|e| {
        log_rejection("remove", id, &e);
        e
    })?;
    Ok(Json(TimerResponse::ok(format!("Timer {} removed", id), timer)))
}

/// Handle POST /timers/start-all
pub async fn start_all_handler(State(service): State<TimerService>) -> ApiResult<Json<BatchResponse>> {
    Ok(Json(BatchResponse::new("start", service.start_all()?)))
}

/// Handle POST /timers/pause-all
pub async fn pause_all_handler(State(service): State<TimerService>) -> ApiResult<Json<BatchResponse>> {
    Ok(Json(BatchResponse::new("pause", service.pause_all()?)))
}

/// Handle POST /timers/reset-all
pub async fn reset_all_handler(State(service): State<TimerService>) -> ApiResult<Json<BatchResponse>> {
    Ok(Json(BatchResponse::new("reset", service.reset_all()?)))
}

/// Handle GET /events - Stream timer notifications as server-sent events
pub async fn events_handler(
    State(service): State<TimerService>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Notification subscriber connected");
    let rx = service.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.kind()).json_data(&event) {
                    Ok(sse) => return Some((Ok(sse), rx)),
                    Err(e) => warn!("Failed to encode {} event: {}", event.kind(), e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Notification subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(service): State<TimerService>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(service.get_uptime()))
}
