use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Stopped,
    Paused,
    Running,
}

impl TimerState {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerState::Stopped => "stopped",
            TimerState::Paused => "paused",
            TimerState::Running => "running",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopped" => Ok(TimerState::Stopped),
            "paused" => Ok(TimerState::Paused),
            "running" => Ok(TimerState::Running),
            other => Err(format!("unknown timer state: {other}")),
        }
    }
}

/// Persisted engine state.
///
/// This is the only thing carried across a suspend/resume boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    /// Length of the current (or most recently run) timer in seconds.
    pub total_seconds: u64,
    /// Seconds left as of the last write.
    pub remaining_seconds: u64,
    /// Epoch seconds at which the background alarm was armed.
    #[serde(default)]
    pub alarm_set_at: Option<i64>,
}

impl TimerSnapshot {
    /// A fresh stopped timer of `total_seconds`.
    pub fn stopped(total_seconds: u64) -> Self {
        Self {
            state: TimerState::Stopped,
            total_seconds,
            remaining_seconds: total_seconds,
            alarm_set_at: None,
        }
    }

    /// Whether the snapshot can be trusted as a resume point.
    ///
    /// Stopped snapshots are always usable because resume re-derives their
    /// length from config anyway.
    pub fn is_consistent(&self) -> bool {
        match self.state {
            TimerState::Stopped => true,
            TimerState::Paused | TimerState::Running => {
                self.total_seconds > 0 && self.remaining_seconds <= self.total_seconds
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_string_roundtrip() {
        for state in [TimerState::Stopped, TimerState::Paused, TimerState::Running] {
            assert_eq!(state.as_str().parse::<TimerState>().unwrap(), state);
        }
        assert!("drifting".parse::<TimerState>().is_err());
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&TimerState::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }

    #[test]
    fn inconsistent_snapshots_are_detected() {
        let mut snap = TimerSnapshot::stopped(1500);
        assert!(snap.is_consistent());

        snap.state = TimerState::Running;
        snap.remaining_seconds = 1501;
        assert!(!snap.is_consistent());

        snap.total_seconds = 0;
        snap.remaining_seconds = 0;
        assert!(!snap.is_consistent());
    }
}
