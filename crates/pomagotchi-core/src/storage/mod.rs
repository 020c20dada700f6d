mod config;
pub mod database;
pub mod game_store;
pub mod migrations;

pub use config::{Config, NotificationConfig, NotificationStyle, SessionConfig, TimerConfig};
pub use database::Database;
pub use game_store::GameStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomagotchi[-dev]/` based on POMAGOTCHI_ENV.
///
/// Set POMAGOTCHI_ENV=dev to use development data directory.
/// POMAGOTCHI_DATA_DIR overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMAGOTCHI_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POMAGOTCHI_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pomagotchi-dev")
            } else {
                base_dir.join("pomagotchi")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
