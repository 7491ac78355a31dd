//! Error types shared by the registry, controller and API

use thiserror::Error;

use crate::state::TimerId;

/// Errors raised by timer operations. None of them are fatal; callers treat
/// them as ignored commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("duration must not be negative (got {0} seconds)")]
    InvalidDuration(i64),

    #[error("timer {0} not found")]
    NotFound(TimerId),

    #[error("timer {id} cannot change state: {reason}")]
    InvalidTransition { id: TimerId, reason: &'static str },

    #[error("timer service unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T, E = TimerError> = std::result::Result<T, E>;
