mod config;
mod ledger_file;

pub use config::{
    Bounds, Settings, DAILY_GOAL_BOUNDS, FOCUS_BOUNDS, LONG_BREAK_BOUNDS, SESSIONS_BOUNDS,
    SHORT_BREAK_BOUNDS,
};
pub use ledger_file::{load_ledger, save_ledger, stats_path};

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Returns the directory holding `config.toml` and `stats.json`.
///
/// `POMOTICK_DATA_DIR` wins if set. Otherwise `~/.config/pomotick[-dev]/`
/// based on `POMOTICK_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOTICK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| CoreError::DataDir("home directory not found".into()))?
                .join(".config");

            let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotick-dev")
            } else {
                base_dir.join("pomotick")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
