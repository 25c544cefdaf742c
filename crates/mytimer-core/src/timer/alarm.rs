//! One-shot wake alarm.
//!
//! The engine never touches an OS alarm facility directly. It asks a
//! [`Scheduler`] to arm a single wake-up at an absolute epoch second and to
//! disarm it again; the host decides what "waking" means.

/// Absolute epoch second at which a timer with `remaining_seconds` left
/// at `now` runs out.
pub fn wake_up_time(now: i64, remaining_seconds: u64) -> i64 {
    let remaining = i64::try_from(remaining_seconds).unwrap_or(i64::MAX);
    now.saturating_add(remaining)
}

/// Arms and disarms the single background wake-up of an engine.
///
/// `arm` replaces any previously armed wake-up. When the wake-up fires the
/// host calls [`TimerEngine::handle_wake`](super::TimerEngine::handle_wake).
pub trait Scheduler {
    fn arm(&mut self, at_epoch_secs: i64);
    fn disarm(&mut self);
}

impl<T: Scheduler + ?Sized> Scheduler for &mut T {
    fn arm(&mut self, at_epoch_secs: i64) {
        (**self).arm(at_epoch_secs);
    }

    fn disarm(&mut self) {
        (**self).disarm();
    }
}

/// Scheduler that only records what it was asked to do.
///
/// The host polls [`ManualScheduler::is_due`] and delivers the wake-up
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    armed_at: Option<i64>,
    arm_count: u32,
    disarm_count: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending wake-up time, if any.
    pub fn armed_at(&self) -> Option<i64> {
        self.armed_at
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.armed_at.is_some_and(|at| now >= at)
    }

    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }

    pub fn disarm_count(&self) -> u32 {
        self.disarm_count
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, at_epoch_secs: i64) {
        self.armed_at = Some(at_epoch_secs);
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.armed_at = None;
        self.disarm_count += 1;
    }
}
