mod config;
pub mod database;
pub mod state;
mod store;

pub use config::{Config, DisplayConfig, PersistenceConfig, ShortcutsConfig, UiConfig};
pub use database::Database;
pub use state::{
    decode_state, encode_state, PersistedState, Theme, UiPrefs, MAX_STORED_INTEGER,
    STORAGE_KEY,
};
pub use store::{MemoryStore, StateStore};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `CHRONOMINIMAL_DATA_DIR` wins when set. Otherwise
/// `~/.config/chronominimal[-dev]/`, with CHRONOMINIMAL_ENV=dev selecting
/// the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("CHRONOMINIMAL_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("CHRONOMINIMAL_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("chronominimal-dev")
            } else {
                base_dir.join("chronominimal")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
