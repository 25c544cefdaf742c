use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Controls, TimerState};

/// Why a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Ticked down to zero in the foreground.
    Expired,
    /// The user stopped it.
    Stopped,
    /// Ran out while nothing was ticking; caught by reconciliation.
    ExpiredInBackground,
    /// The background wake-up fired.
    Woken,
}

/// Every state change in the engine produces an Event.
/// Hosts render them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        total_seconds: u64,
        remaining_seconds: u64,
        /// `true` when continuing a paused countdown.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerFinished {
        reason: FinishReason,
        /// Length of the fresh timer that is now ready to start.
        next_total_seconds: u64,
        at: DateTime<Utc>,
    },
    Suspended {
        state: TimerState,
        remaining_seconds: u64,
        /// Epoch seconds of the armed wake-up, if any.
        wake_at: Option<i64>,
        at: DateTime<Utc>,
    },
    Resumed {
        state: TimerState,
        remaining_seconds: u64,
        /// Background seconds subtracted during reconciliation.
        elapsed_seconds: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        display: String,
        remaining_seconds: u64,
        total_seconds: u64,
        progress: u64,
        controls: Controls,
        at: DateTime<Utc>,
    },
}
