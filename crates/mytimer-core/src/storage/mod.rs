mod config;
pub mod database;
mod preferences;
mod store;

pub use config::{
    validate_timer_length, Config, LogConfig, TimerConfig, DEFAULT_TIMER_LENGTH_MINUTES,
};
pub use database::Database;
pub use preferences::Preferences;
pub use store::{MemoryStore, TimerStore};

use std::path::PathBuf;

/// Returns the data directory.
///
/// `MYTIMER_DATA_DIR` overrides everything. Otherwise this is
/// `~/.config/mytimer[-dev]/`, with the `-dev` suffix when `MYTIMER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("MYTIMER_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MYTIMER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("mytimer-dev")
            } else {
                base_dir.join("mytimer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
