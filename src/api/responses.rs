//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    state::{BatchReport, TimerState},
};

/// Body of `POST /timers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTimerRequest {
    #[serde(default)]
    pub name: String,
    pub duration_seconds: i64,
}

/// Single timer wrapped with a status message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
    /// `mm:ss` rendering of `timer.seconds_left`
    pub remaining: String,
    /// `mm:ss` rendering of `timer.full_duration_seconds`
    pub duration: String,
}

impl TimerResponse {
    pub fn ok(message: String, timer: TimerState) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            remaining: timer.remaining_display(),
            duration: timer.duration_display(),
            timer,
        }
    }
}

/// Every timer in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerListResponse {
    pub timers: Vec<TimerState>,
    pub running: usize,
    pub timestamp: DateTime<Utc>,
}

impl TimerListResponse {
    pub fn new(timers: Vec<TimerState>) -> Self {
        Self {
            running: timers.iter().filter(|timer| timer.is_running()).count(),
            timers,
            timestamp: Utc::now(),
        }
    }
}

/// Result of a batch command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub report: BatchReport,
}

impl BatchResponse {
    pub fn new(action: &str, report: BatchReport) -> Self {
        Self {
            status: "ok".to_string(),
            message: format!(
                "{} applied to {} timers, {} skipped",
                action,
                report.timers.len(),
                report.skipped.len()
            ),
            timestamp: Utc::now(),
            report,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}

/// Error body returned for rejected commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Maps [`TimerError`] onto an HTTP status and JSON body
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(err: TimerError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            TimerError::InvalidDuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TimerError::NotFound(_) => StatusCode::NOT_FOUND,
            TimerError::InvalidTransition { .. } => StatusCode::CONFLICT,
            TimerError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
