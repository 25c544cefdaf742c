//! Timer engine implementation.
//!
//! The engine is a single countdown driven by the host: it does not use
//! internal threads, the caller invokes `tick()` once per second while the
//! timer is in the foreground. When the host is about to stop ticking it
//! calls `suspend_to_background()`, which persists the snapshot and arms a
//! one-shot wake-up; `resume_from_background()` reloads the snapshot and
//! subtracts the wall-clock time that passed in between.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running -> Paused -> Running -> ... -> Stopped
//! ```
//!
//! Every path back to `Stopped` goes through `finish()`, which resets to a
//! fresh full-length countdown and is idempotent.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(store, scheduler, SystemClock);
//! engine.resume_from_background();
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::TimerFinished) at zero
//! // Going away:
//! engine.suspend_to_background();
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::alarm::{wake_up_time, Scheduler};
use super::clock::Clock;
use super::render::TimerView;
use super::state::{TimerSnapshot, TimerState};
use crate::events::{Event, FinishReason};
use crate::storage::{TimerStore, DEFAULT_TIMER_LENGTH_MINUTES};

/// Core timer engine.
///
/// Owns its store, wake scheduler and clock. No operation returns an error:
/// store failures are logged and the engine falls back to a fresh stopped
/// timer.
pub struct TimerEngine<S, A, C> {
    store: S,
    scheduler: A,
    clock: C,
    snapshot: TimerSnapshot,
    /// Whether the host is currently delivering ticks.
    ticking: bool,
}

impl<S: TimerStore, A: Scheduler, C: Clock> TimerEngine<S, A, C> {
    /// Create an engine from whatever the store holds.
    ///
    /// The snapshot is taken as-is, without reconciliation, and the engine
    /// does not tick: it sits in the backgrounded position until
    /// `resume_from_background()` is called. A stopped snapshot is given a
    /// fresh length from config.
    pub fn new(store: S, scheduler: A, clock: C) -> Self {
        let mut engine = Self {
            store,
            scheduler,
            clock,
            snapshot: TimerSnapshot::default(),
            ticking: false,
        };
        let persisted = engine.load_persisted();
        engine.snapshot = if persisted.state == TimerState::Stopped {
            engine.fresh_snapshot()
        } else {
            persisted
        };
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.snapshot.state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.snapshot.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.snapshot.total_seconds
    }

    /// Epoch seconds at which the current background alarm was armed.
    pub fn alarm_set_at(&self) -> Option<i64> {
        self.snapshot.alarm_set_at
    }

    /// Epoch second at which the armed wake-up is due.
    pub fn wake_due_at(&self) -> Option<i64> {
        self.snapshot
            .alarm_set_at
            .map(|armed_at| wake_up_time(armed_at, self.snapshot.remaining_seconds))
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot
    }

    pub fn view(&self) -> TimerView {
        TimerView::from(&self.snapshot)
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        let view = self.view();
        Event::StateSnapshot {
            state: view.state,
            display: view.display,
            remaining_seconds: view.remaining_seconds,
            total_seconds: view.total_seconds,
            progress: view.progress,
            controls: view.controls,
            at: self.at(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &A {
        &self.scheduler
    }

    pub fn into_parts(self) -> (S, A, C) {
        (self.store, self.scheduler, self.clock)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let resumed = match self.snapshot.state {
            TimerState::Running => {
                debug!("start ignored: timer already running");
                return None;
            }
            TimerState::Stopped => {
                let total = self.configured_length_seconds();
                self.snapshot = TimerSnapshot {
                    state: TimerState::Running,
                    total_seconds: total,
                    remaining_seconds: total,
                    alarm_set_at: None,
                };
                false
            }
            TimerState::Paused => {
                self.snapshot.state = TimerState::Running;
                true
            }
        };
        self.ticking = true;
        self.persist();
        info!(
            total_seconds = self.snapshot.total_seconds,
            remaining_seconds = self.snapshot.remaining_seconds,
            resumed,
            "timer started"
        );
        Some(Event::TimerStarted {
            total_seconds: self.snapshot.total_seconds,
            remaining_seconds: self.snapshot.remaining_seconds,
            resumed,
            at: self.at(),
        })
    }

    /// Hosts resume before pausing. Pausing a suspended timer drops the
    /// alarm without subtracting the time spent in the background.
    pub fn pause(&mut self) -> Option<Event> {
        if self.snapshot.state != TimerState::Running {
            debug!(state = %self.snapshot.state, "pause ignored");
            return None;
        }
        self.ticking = false;
        self.snapshot.state = TimerState::Paused;
        // Paused timers never expire in the background.
        if let Some(armed_at) = self.snapshot.alarm_set_at.take() {
            debug!(armed_at, "paused while suspended; background time not subtracted");
            self.scheduler.disarm();
        }
        self.persist();
        info!(remaining_seconds = self.snapshot.remaining_seconds, "timer paused");
        Some(Event::TimerPaused {
            remaining_seconds: self.snapshot.remaining_seconds,
            at: self.at(),
        })
    }

    pub fn stop(&mut self) -> Option<Event> {
        if self.snapshot.state == TimerState::Stopped {
            debug!("stop ignored: timer already stopped");
            return None;
        }
        Some(self.finish(FinishReason::Stopped))
    }

    /// Call once per second while ticking. Returns
    /// `Some(Event::TimerFinished)` when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.snapshot.state != TimerState::Running || !self.ticking {
            return None;
        }
        self.snapshot.remaining_seconds = self.snapshot.remaining_seconds.saturating_sub(1);
        if self.snapshot.remaining_seconds == 0 {
            debug!("countdown reached zero");
            return Some(self.finish(FinishReason::Expired));
        }
        None
    }

    /// The host is about to stop delivering ticks.
    ///
    /// A running timer gets a wake-up armed at the moment it would run out;
    /// paused and stopped timers never expire in the background. The
    /// snapshot is persisted in every case.
    pub fn suspend_to_background(&mut self) -> Option<Event> {
        let now = self.clock.now();
        self.ticking = false;

        let wake_at = match self.snapshot.state {
            TimerState::Running => match self.snapshot.alarm_set_at {
                // Already suspended: the first alarm still holds.
                Some(armed_at) => {
                    debug!(armed_at, "suspend while already suspended; keeping alarm");
                    Some(wake_up_time(armed_at, self.snapshot.remaining_seconds))
                }
                None => {
                    let at = wake_up_time(now, self.snapshot.remaining_seconds);
                    self.scheduler.arm(at);
                    self.snapshot.alarm_set_at = Some(now);
                    Some(at)
                }
            },
            TimerState::Paused | TimerState::Stopped => {
                self.snapshot.alarm_set_at = None;
                None
            }
        };

        self.persist();
        info!(
            state = %self.snapshot.state,
            remaining_seconds = self.snapshot.remaining_seconds,
            wake_at = ?wake_at,
            "timer suspended"
        );
        Some(Event::Suspended {
            state: self.snapshot.state,
            remaining_seconds: self.snapshot.remaining_seconds,
            wake_at,
            at: DateTime::from_timestamp(now, 0).unwrap_or_default(),
        })
    }

    /// The host can deliver ticks again.
    ///
    /// Reloads the persisted snapshot, subtracts the time that passed since
    /// the alarm was armed, and either finishes the timer (it ran out in the
    /// background) or resumes ticking from the reconciled remainder.
    pub fn resume_from_background(&mut self) -> Option<Event> {
        let now = self.clock.now();
        self.ticking = false;

        let persisted = self.load_persisted();
        let mut snap = if persisted.state == TimerState::Stopped {
            self.fresh_snapshot()
        } else {
            persisted
        };

        let mut elapsed = 0;
        if let Some(armed_at) = persisted.alarm_set_at {
            if persisted.state == TimerState::Running {
                // A clock that went backwards must not add time.
                elapsed = u64::try_from(now.saturating_sub(armed_at)).unwrap_or(0);
            } else {
                debug!(armed_at, state = %persisted.state, "discarding stale alarm");
            }
        }

        snap.remaining_seconds = snap.remaining_seconds.saturating_sub(elapsed);
        snap.alarm_set_at = None;
        self.snapshot = snap;

        if snap.remaining_seconds == 0 {
            info!(elapsed_seconds = elapsed, "timer ran out in the background");
            return Some(self.finish(FinishReason::ExpiredInBackground));
        }

        self.scheduler.disarm();
        self.persist();
        self.ticking = snap.state == TimerState::Running;
        info!(
            state = %snap.state,
            remaining_seconds = snap.remaining_seconds,
            elapsed_seconds = elapsed,
            "timer resumed"
        );
        Some(Event::Resumed {
            state: snap.state,
            remaining_seconds: snap.remaining_seconds,
            elapsed_seconds: elapsed,
            at: DateTime::from_timestamp(now, 0).unwrap_or_default(),
        })
    }

    /// The background wake-up fired.
    ///
    /// Does nothing unless an alarm is armed, so a wake-up that loses the
    /// race against `resume_from_background()` is harmless.
    pub fn handle_wake(&mut self) -> Option<Event> {
        if self.snapshot.alarm_set_at.is_none() {
            debug!("wake ignored: no alarm armed");
            return None;
        }
        Some(self.finish(FinishReason::Woken))
    }

    /// Deliver the wake-up only once its deadline has passed.
    ///
    /// For hosts that poll instead of relying on an exact OS alarm: an
    /// early call leaves the countdown untouched.
    pub fn handle_wake_if_due(&mut self) -> Option<Event> {
        let due_at = self.wake_due_at()?;
        let now = self.clock.now();
        if now < due_at {
            debug!(now, due_at, "wake ignored: not due yet");
            return None;
        }
        self.handle_wake()
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Reset to a fresh stopped countdown of the configured length.
    /// Calling it again leaves the same snapshot.
    fn finish(&mut self, reason: FinishReason) -> Event {
        self.ticking = false;
        self.snapshot = self.fresh_snapshot();
        self.scheduler.disarm();
        self.persist();
        info!(
            reason = ?reason,
            next_total_seconds = self.snapshot.total_seconds,
            "timer finished"
        );
        Event::TimerFinished {
            reason,
            next_total_seconds: self.snapshot.total_seconds,
            at: self.at(),
        }
    }

    fn fresh_snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::stopped(self.configured_length_seconds())
    }

    fn configured_length_seconds(&self) -> u64 {
        let minutes = match self.store.timer_length_minutes() {
            Ok(0) => {
                warn!("configured timer length is zero; using default");
                DEFAULT_TIMER_LENGTH_MINUTES
            }
            Ok(minutes) => minutes,
            Err(e) => {
                warn!(error = %e, "failed to read timer length; using default");
                DEFAULT_TIMER_LENGTH_MINUTES
            }
        };
        u64::from(minutes) * 60
    }

    fn load_persisted(&self) -> TimerSnapshot {
        match self.store.load_snapshot() {
            Ok(snap) if snap.is_consistent() => snap,
            Ok(snap) => {
                warn!(?snap, "discarding inconsistent timer snapshot");
                self.fresh_snapshot()
            }
            Err(e) => {
                warn!(error = %e, "failed to load timer snapshot; starting fresh");
                self.fresh_snapshot()
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save_snapshot(&self.snapshot) {
            warn!(error = %e, "failed to persist timer snapshot");
        }
    }

    fn at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.clock.now(), 0).unwrap_or_default()
    }
}
