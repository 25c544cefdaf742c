//! Pure projections of timer state for display.
//!
//! Nothing here touches the engine; hosts feed in a [`TimerSnapshot`] and
//! draw whatever comes out.

use serde::{Deserialize, Serialize};

use super::state::{TimerSnapshot, TimerState};

/// `m:ss`, seconds always two digits.
pub fn format_remaining(remaining_seconds: u64) -> String {
    format!("{}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

/// Elapsed seconds on a `0..=total` scale.
pub fn progress(total_seconds: u64, remaining_seconds: u64) -> u64 {
    total_seconds.saturating_sub(remaining_seconds)
}

/// Which controls a host should offer in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub stop_enabled: bool,
}

impl Controls {
    pub fn for_state(state: TimerState) -> Self {
        match state {
            TimerState::Running => Self {
                start_enabled: false,
                pause_enabled: true,
                stop_enabled: true,
            },
            TimerState::Paused => Self {
                start_enabled: true,
                pause_enabled: false,
                stop_enabled: true,
            },
            TimerState::Stopped => Self {
                start_enabled: true,
                pause_enabled: false,
                stop_enabled: false,
            },
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub state: TimerState,
    pub display: String,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub progress: u64,
    pub controls: Controls,
}

impl From<&TimerSnapshot> for TimerView {
    fn from(snap: &TimerSnapshot) -> Self {
        let remaining = snap.remaining_seconds.min(snap.total_seconds);
        Self {
            state: snap.state,
            display: format_remaining(remaining),
            remaining_seconds: remaining,
            total_seconds: snap.total_seconds,
            progress: progress(snap.total_seconds, remaining),
            controls: Controls::for_state(snap.state),
        }
    }
}
