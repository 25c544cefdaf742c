//! # mytimer Core Library
//!
//! This library provides the core logic for the mytimer countdown timer.
//! Hosts (the `mytimer` CLI, or any UI) drive the engine and render what it
//! returns; the engine never owns a thread or a window.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a Stopped/Paused/Running state machine that requires
//!   the caller to invoke `tick()` once per second, plus the reconciliation
//!   that recovers time spent in the background
//! - **Storage**: TOML-based configuration and a SQLite key/value table for
//!   the persisted snapshot
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerStore`]: Persistent store contract, with [`Preferences`] and
//!   [`MemoryStore`] implementations
//! - [`Scheduler`]: One-shot background wake-up
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StoreError};
pub use events::{Event, FinishReason};
pub use storage::{Config, Database, MemoryStore, Preferences, TimerStore};
pub use timer::{
    Clock, Controls, ManualClock, ManualScheduler, Scheduler, SystemClock, TimerEngine,
    TimerSnapshot, TimerState, TimerView,
};
