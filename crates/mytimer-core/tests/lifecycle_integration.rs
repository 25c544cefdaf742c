//! Integration tests for the suspend/resume lifecycle across process runs.

use mytimer_core::{
    Event, FinishReason, ManualClock, ManualScheduler, Preferences, TimerEngine, TimerSnapshot,
    TimerState, TimerStore,
};

/// Open the on-disk store the way a fresh process would.
fn open_engine(
    dir: &std::path::Path,
    clock: &ManualClock,
) -> TimerEngine<Preferences, ManualScheduler, ManualClock> {
    let prefs = Preferences::open_in(dir).unwrap();
    TimerEngine::new(prefs, ManualScheduler::new(), clock.clone())
}

#[test]
fn test_running_timer_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(1000);

    // First process: start and go to background.
    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    engine.start();
    engine.suspend_to_background();
    assert_eq!(engine.scheduler().armed_at(), Some(2500));
    drop(engine);

    // Second process, ten minutes later.
    clock.set(1600);
    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    assert_eq!(engine.state(), TimerState::Running);
    assert_eq!(engine.remaining_seconds(), 900);
    assert!(engine.is_ticking());
}

#[test]
fn test_timer_expires_while_process_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(1000);

    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    engine.start();
    engine.suspend_to_background();
    drop(engine);

    clock.set(2700);
    let mut engine = open_engine(dir.path(), &clock);
    let event = engine.resume_from_background().unwrap();
    assert!(matches!(
        event,
        Event::TimerFinished {
            reason: FinishReason::ExpiredInBackground,
            ..
        }
    ));
    assert_eq!(engine.snapshot(), TimerSnapshot::stopped(1500));
    assert_eq!(
        engine.store().load_snapshot().unwrap(),
        TimerSnapshot::stopped(1500)
    );
}

#[test]
fn test_wake_receiver_then_foreground() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(1000);

    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    engine.start();
    engine.suspend_to_background();
    drop(engine);

    // The wake-up is delivered to a separate, short-lived engine.
    clock.set(2500);
    let mut receiver = open_engine(dir.path(), &clock);
    assert!(receiver.handle_wake().is_some());
    drop(receiver);

    clock.set(2600);
    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    assert_eq!(engine.state(), TimerState::Stopped);
    assert_eq!(engine.remaining_seconds(), 1500);
}

#[test]
fn test_paused_timer_does_not_expire_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);

    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    engine.start();
    for _ in 0..10 {
        engine.tick();
    }
    engine.pause();
    engine.suspend_to_background();
    assert!(!engine.scheduler().is_armed());
    drop(engine);

    clock.set(1_000_000);
    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    assert_eq!(engine.state(), TimerState::Paused);
    assert_eq!(engine.remaining_seconds(), 1490);
}

#[test]
fn test_changed_length_applies_to_next_timer_only() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);

    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    engine.start();
    engine.suspend_to_background();
    drop(engine);

    let mut prefs = Preferences::open_in(dir.path()).unwrap();
    prefs.set_timer_length_minutes(1).unwrap();
    drop(prefs);

    clock.set(30);
    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    assert_eq!(engine.total_seconds(), 1500);
    assert_eq!(engine.remaining_seconds(), 1470);

    engine.stop();
    assert_eq!(engine.total_seconds(), 60);
}

#[test]
fn test_corrupt_database_value_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = Preferences::open_in(dir.path()).unwrap();
    prefs.database().kv_set("timer.state", "bogus").unwrap();
    drop(prefs);

    let clock = ManualClock::new(0);
    let mut engine = open_engine(dir.path(), &clock);
    engine.resume_from_background();
    assert_eq!(engine.snapshot(), TimerSnapshot::stopped(1500));
    assert!(engine.start().is_some());
}
