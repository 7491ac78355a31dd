//! Change notifications pushed to the presentation layer

use serde::{Deserialize, Serialize};

use super::{TimerId, TimerState};

/// One notification per state change, keyed by timer id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerEvent {
    /// The timer's state changed
    Updated { id: TimerId, state: TimerState },
    /// The timer reached zero; the presentation layer should alert the user
    Finished {
        id: TimerId,
        name: String,
        state: TimerState,
    },
    /// The timer no longer exists
    Removed { id: TimerId },
}

impl TimerEvent {
    pub fn id(&self) -> TimerId {
        match self {
            Self::Updated { id, .. } | Self::Finished { id, .. } | Self::Removed { id } => *id,
        }
    }

    /// Short event name, used as the SSE event type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Updated { .. } => "updated",
            Self::Finished { .. } => "finished",
            Self::Removed { .. } => "removed",
        }
    }

    /// Updated state carried by the event, if the timer still exists
    pub fn state(&self) -> Option<&TimerState> {
        match self {
            Self::Updated { state, .. } | Self::Finished { state, .. } => Some(state),
            Self::Removed { .. } => None,
        }
    }
}
