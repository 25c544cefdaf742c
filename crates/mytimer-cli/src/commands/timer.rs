//! Timer commands.
//!
//! Every invocation is one foreground session: the engine is resumed from
//! the persisted snapshot, the command is applied, and the engine is
//! suspended again before the process exits. `watch` keeps the session
//! open and ticks once per second.

use std::time::Duration;

use chrono::DateTime;
use clap::Subcommand;
use mytimer_core::timer::format_remaining;
use mytimer_core::{Event, Preferences, Scheduler, SystemClock, TimerEngine};
use serde::Serialize;
use tracing::{debug, info};

type CliEngine = TimerEngine<Preferences, LoggingScheduler, SystemClock>;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a new countdown, or continue a paused one
    Start,
    /// Pause the running countdown
    Pause,
    /// Stop and reset to a fresh countdown
    Stop,
    /// Print current timer state as JSON
    Status,
    /// Deliver the background wake-up if it is due (e.g. from cron or `at`)
    Wake,
    /// Count down in the foreground until finished or Ctrl-C
    Watch,
}

/// The CLI has no OS alarm to arm: an expired timer is picked up by
/// reconciliation on the next invocation, or by `mytimer timer wake`.
pub struct LoggingScheduler;

impl Scheduler for LoggingScheduler {
    fn arm(&mut self, at_epoch_secs: i64) {
        let at = DateTime::from_timestamp(at_epoch_secs, 0).unwrap_or_default();
        info!(wake_at = %at.to_rfc3339(), "background wake-up armed");
    }

    fn disarm(&mut self) {
        debug!("background wake-up disarmed");
    }
}

#[derive(Serialize)]
struct Output {
    events: Vec<Event>,
    snapshot: Event,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let prefs = Preferences::open()?;
    let engine = TimerEngine::new(prefs, LoggingScheduler, SystemClock);

    match action {
        TimerAction::Start => one_shot(engine, CliEngine::start),
        TimerAction::Pause => one_shot(engine, CliEngine::pause),
        TimerAction::Stop => one_shot(engine, CliEngine::stop),
        TimerAction::Status => one_shot(engine, |_| None),
        TimerAction::Wake => wake(engine),
        TimerAction::Watch => watch(engine),
    }
}

fn one_shot<F>(mut engine: CliEngine, command: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut CliEngine) -> Option<Event>,
{
    let mut events = Vec::new();
    events.extend(engine.resume_from_background());
    events.extend(command(&mut engine));
    let snapshot = engine.snapshot_event();
    events.extend(engine.suspend_to_background());
    print_json(&Output { events, snapshot })
}

/// Acts on the stored state only, like a receiver running while the timer
/// is in the background. Nothing is armed at the OS level, so the deadline
/// is checked here.
fn wake(mut engine: CliEngine) -> Result<(), Box<dyn std::error::Error>> {
    let events: Vec<Event> = engine.handle_wake_if_due().into_iter().collect();
    let snapshot = engine.snapshot_event();
    print_json(&Output { events, snapshot })
}

fn watch(mut engine: CliEngine) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        if let Some(event) = engine.resume_from_background() {
            print_json(&event)?;
        }

        if engine.is_ticking() {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately.
            interval.tick().await;
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            println!("{}", format_remaining(engine.remaining_seconds()));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Some(event) = engine.tick() {
                            print_json(&event)?;
                            break;
                        }
                        println!("{}", format_remaining(engine.remaining_seconds()));
                    }
                    _ = &mut ctrl_c => {
                        debug!("interrupted");
                        break;
                    }
                }
            }
        } else {
            print_json(&engine.snapshot_event())?;
        }

        if let Some(event) = engine.suspend_to_background() {
            print_json(&event)?;
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
