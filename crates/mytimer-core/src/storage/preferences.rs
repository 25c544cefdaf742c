//! Durable [`TimerStore`] backed by the TOML config and the SQLite kv table.
//!
//! The timer length is user configuration and lives in `config.toml`; the
//! snapshot fields are engine state and live in `mytimer.db`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::config::{validate_timer_length, Config};
use super::database::{Database, DB_FILE};
use super::store::TimerStore;
use super::data_dir;
use crate::error::{CoreError, StoreError};
use crate::timer::{TimerSnapshot, TimerState};

const CONFIG_FILE: &str = "config.toml";

const KEY_STATE: &str = "timer.state";
const KEY_PREVIOUS_LENGTH: &str = "timer.previous_length_seconds";
const KEY_REMAINING: &str = "timer.seconds_remaining";
const KEY_ALARM_SET_TIME: &str = "timer.alarm_set_time";

pub struct Preferences {
    db: Database,
    config: Config,
    config_path: PathBuf,
}

impl Preferences {
    /// Open the stores in the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory, database or config file
    /// cannot be opened.
    pub fn open() -> Result<Self, CoreError> {
        Self::open_in(&data_dir()?)
    }

    /// Open the stores inside `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the directory, database or config file cannot be
    /// opened, or the config file holds an invalid value.
    pub fn open_in(dir: &Path) -> Result<Self, CoreError> {
        std::fs::create_dir_all(dir)?;
        let db = Database::open_at(&dir.join(DB_FILE))?;
        let config_path = dir.join(CONFIG_FILE);
        let config = Config::load_from(&config_path)?;
        Ok(Self {
            db,
            config,
            config_path,
        })
    }

    /// Config as of the last read.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn get_parsed<T>(&self, key: &str, default: T) -> Result<T, StoreError>
    where
        T: FromStr,
    {
        match self.db.kv_get(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| StoreError::Corrupt {
                key: key.to_string(),
                value: raw,
            }),
        }
    }

    fn set_display<T: ToString>(&self, key: &str, value: T) -> Result<(), StoreError> {
        self.db.kv_set(key, &value.to_string())?;
        Ok(())
    }
}

impl TimerStore for Preferences {
    /// Re-reads `config.toml` so edits made by another process are seen at
    /// the next timer boundary.
    fn timer_length_minutes(&self) -> Result<u32, StoreError> {
        let config = Config::load_from(&self.config_path)?;
        Ok(config.timer.length_minutes)
    }

    fn set_timer_length_minutes(&mut self, minutes: u32) -> Result<(), StoreError> {
        let mut config = Config::load_from(&self.config_path)?;
        config.timer.length_minutes = validate_timer_length(minutes)?;
        config.save_to(&self.config_path)?;
        self.config = config;
        Ok(())
    }

    fn previous_timer_length_seconds(&self) -> Result<u64, StoreError> {
        self.get_parsed(KEY_PREVIOUS_LENGTH, 0)
    }

    fn set_previous_timer_length_seconds(&mut self, seconds: u64) -> Result<(), StoreError> {
        self.set_display(KEY_PREVIOUS_LENGTH, seconds)
    }

    fn seconds_remaining(&self) -> Result<u64, StoreError> {
        self.get_parsed(KEY_REMAINING, 0)
    }

    fn set_seconds_remaining(&mut self, seconds: u64) -> Result<(), StoreError> {
        self.set_display(KEY_REMAINING, seconds)
    }

    fn timer_state(&self) -> Result<TimerState, StoreError> {
        self.get_parsed(KEY_STATE, TimerState::Stopped)
    }

    fn set_timer_state(&mut self, state: TimerState) -> Result<(), StoreError> {
        self.set_display(KEY_STATE, state)
    }

    fn alarm_set_time(&self) -> Result<i64, StoreError> {
        self.get_parsed(KEY_ALARM_SET_TIME, 0)
    }

    fn set_alarm_set_time(&mut self, epoch_secs: i64) -> Result<(), StoreError> {
        self.set_display(KEY_ALARM_SET_TIME, epoch_secs)
    }

    /// All four fields are written in one transaction.
    fn save_snapshot(&mut self, snap: &TimerSnapshot) -> Result<(), StoreError> {
        let tx = self.db.conn().unchecked_transaction()?;
        self.set_display(KEY_STATE, snap.state)?;
        self.set_display(KEY_PREVIOUS_LENGTH, snap.total_seconds)?;
        self.set_display(KEY_REMAINING, snap.remaining_seconds)?;
        self.set_display(KEY_ALARM_SET_TIME, snap.alarm_set_at.unwrap_or(0))?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open_in(dir.path()).unwrap();
        assert_eq!(prefs.timer_length_minutes().unwrap(), 25);
        assert_eq!(prefs.load_snapshot().unwrap(), TimerSnapshot::stopped(0));
        assert!(dir.path().join(CONFIG_FILE).exists());
        assert!(dir.path().join(DB_FILE).exists());
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let snap = TimerSnapshot {
            state: TimerState::Running,
            total_seconds: 1500,
            remaining_seconds: 1200,
            alarm_set_at: Some(1_700_000_000),
        };
        Preferences::open_in(dir.path())
            .unwrap()
            .save_snapshot(&snap)
            .unwrap();

        let prefs = Preferences::open_in(dir.path()).unwrap();
        assert_eq!(prefs.load_snapshot().unwrap(), snap);
        assert_eq!(
            prefs.database().kv_get(KEY_STATE).unwrap().as_deref(),
            Some("running")
        );
    }

    #[test]
    fn timer_length_is_reread_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open_in(dir.path()).unwrap();

        let mut cfg = Config::default();
        cfg.set("timer.length_minutes", "10").unwrap();
        cfg.save_to(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(prefs.timer_length_minutes().unwrap(), 10);
    }

    #[test]
    fn set_timer_length_validates_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut prefs = Preferences::open_in(dir.path()).unwrap();
        assert!(prefs.set_timer_length_minutes(0).is_err());
        prefs.set_timer_length_minutes(50).unwrap();
        assert_eq!(prefs.config().timer.length_minutes, 50);

        let reopened = Preferences::open_in(dir.path()).unwrap();
        assert_eq!(reopened.timer_length_minutes().unwrap(), 50);
    }

    #[test]
    fn garbage_values_are_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open_in(dir.path()).unwrap();
        prefs.database().kv_set(KEY_STATE, "drifting").unwrap();
        prefs.database().kv_set(KEY_REMAINING, "-3").unwrap();

        assert!(matches!(
            prefs.timer_state(),
            Err(StoreError::Corrupt { .. })
        ));
        assert!(matches!(
            prefs.seconds_remaining(),
            Err(StoreError::Corrupt { .. })
        ));
        assert!(prefs.load_snapshot().is_err());
    }
}
