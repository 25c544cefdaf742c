//! The persistent store contract the timer engine depends on.

use crate::error::StoreError;
use crate::timer::{TimerSnapshot, TimerState};

use super::config::{validate_timer_length, DEFAULT_TIMER_LENGTH_MINUTES};

/// Durable get/set of the timer's configuration and last-known state.
///
/// An alarm time of `0` means no alarm is armed.
pub trait TimerStore {
    fn timer_length_minutes(&self) -> Result<u32, StoreError>;
    fn set_timer_length_minutes(&mut self, minutes: u32) -> Result<(), StoreError>;

    fn previous_timer_length_seconds(&self) -> Result<u64, StoreError>;
    fn set_previous_timer_length_seconds(&mut self, seconds: u64) -> Result<(), StoreError>;

    fn seconds_remaining(&self) -> Result<u64, StoreError>;
    fn set_seconds_remaining(&mut self, seconds: u64) -> Result<(), StoreError>;

    fn timer_state(&self) -> Result<TimerState, StoreError>;
    fn set_timer_state(&mut self, state: TimerState) -> Result<(), StoreError>;

    fn alarm_set_time(&self) -> Result<i64, StoreError>;
    fn set_alarm_set_time(&mut self, epoch_secs: i64) -> Result<(), StoreError>;

    fn load_snapshot(&self) -> Result<TimerSnapshot, StoreError> {
        let alarm = self.alarm_set_time()?;
        Ok(TimerSnapshot {
            state: self.timer_state()?,
            total_seconds: self.previous_timer_length_seconds()?,
            remaining_seconds: self.seconds_remaining()?,
            alarm_set_at: (alarm > 0).then_some(alarm),
        })
    }

    fn save_snapshot(&mut self, snap: &TimerSnapshot) -> Result<(), StoreError> {
        self.set_timer_state(snap.state)?;
        self.set_previous_timer_length_seconds(snap.total_seconds)?;
        self.set_seconds_remaining(snap.remaining_seconds)?;
        self.set_alarm_set_time(snap.alarm_set_at.unwrap_or(0))?;
        Ok(())
    }
}

impl<T: TimerStore + ?Sized> TimerStore for &mut T {
    fn timer_length_minutes(&self) -> Result<u32, StoreError> {
        (**self).timer_length_minutes()
    }
    fn set_timer_length_minutes(&mut self, minutes: u32) -> Result<(), StoreError> {
        (**self).set_timer_length_minutes(minutes)
    }
    fn previous_timer_length_seconds(&self) -> Result<u64, StoreError> {
        (**self).previous_timer_length_seconds()
    }
    fn set_previous_timer_length_seconds(&mut self, seconds: u64) -> Result<(), StoreError> {
        (**self).set_previous_timer_length_seconds(seconds)
    }
    fn seconds_remaining(&self) -> Result<u64, StoreError> {
        (**self).seconds_remaining()
    }
    fn set_seconds_remaining(&mut self, seconds: u64) -> Result<(), StoreError> {
        (**self).set_seconds_remaining(seconds)
    }
    fn timer_state(&self) -> Result<TimerState, StoreError> {
        (**self).timer_state()
    }
    fn set_timer_state(&mut self, state: TimerState) -> Result<(), StoreError> {
        (**self).set_timer_state(state)
    }
    fn alarm_set_time(&self) -> Result<i64, StoreError> {
        (**self).alarm_set_time()
    }
    fn set_alarm_set_time(&mut self, epoch_secs: i64) -> Result<(), StoreError> {
        (**self).set_alarm_set_time(epoch_secs)
    }
    fn load_snapshot(&self) -> Result<TimerSnapshot, StoreError> {
        (**self).load_snapshot()
    }
    fn save_snapshot(&mut self, snap: &TimerSnapshot) -> Result<(), StoreError> {
        (**self).save_snapshot(snap)
    }
}

/// In-process store. Nothing survives the process, which is exactly what
/// tests and embedders that persist elsewhere want.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    timer_length_minutes: u32,
    previous_timer_length_seconds: u64,
    seconds_remaining: u64,
    timer_state: TimerState,
    alarm_set_time: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            timer_length_minutes: DEFAULT_TIMER_LENGTH_MINUTES,
            previous_timer_length_seconds: 0,
            seconds_remaining: 0,
            timer_state: TimerState::Stopped,
            alarm_set_time: 0,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preconfigured with a timer length.
    ///
    /// # Errors
    /// Returns an error if `minutes` is zero.
    pub fn with_timer_length(minutes: u32) -> Result<Self, StoreError> {
        let mut store = Self::default();
        store.set_timer_length_minutes(minutes)?;
        Ok(store)
    }
}

impl TimerStore for MemoryStore {
    fn timer_length_minutes(&self) -> Result<u32, StoreError> {
        Ok(self.timer_length_minutes)
    }
    fn set_timer_length_minutes(&mut self, minutes: u32) -> Result<(), StoreError> {
        self.timer_length_minutes = validate_timer_length(minutes)?;
        Ok(())
    }
    fn previous_timer_length_seconds(&self) -> Result<u64, StoreError> {
        Ok(self.previous_timer_length_seconds)
    }
    fn set_previous_timer_length_seconds(&mut self, seconds: u64) -> Result<(), StoreError> {
        self.previous_timer_length_seconds = seconds;
        Ok(())
    }
    fn seconds_remaining(&self) -> Result<u64, StoreError> {
        Ok(self.seconds_remaining)
    }
    fn set_seconds_remaining(&mut self, seconds: u64) -> Result<(), StoreError> {
        self.seconds_remaining = seconds;
        Ok(())
    }
    fn timer_state(&self) -> Result<TimerState, StoreError> {
        Ok(self.timer_state)
    }
    fn set_timer_state(&mut self, state: TimerState) -> Result<(), StoreError> {
        self.timer_state = state;
        Ok(())
    }
    fn alarm_set_time(&self) -> Result<i64, StoreError> {
        Ok(self.alarm_set_time)
    }
    fn set_alarm_set_time(&mut self, epoch_secs: i64) -> Result<(), StoreError> {
        self.alarm_set_time = epoch_secs;
        Ok(())
    }
}
