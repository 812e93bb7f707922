mod config;
pub mod database;
pub mod migrations;
pub mod period_log;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use period_log::{MemoryPeriodLog, PeriodEntry, PeriodLog, QueuedPeriodLog};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/pomostudy[-dev]/` based on POMOSTUDY_ENV.
///
/// Set POMOSTUDY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOSTUDY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomostudy-dev")
    } else {
        base_dir.join("pomostudy")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
