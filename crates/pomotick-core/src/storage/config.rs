//! TOML-based timer settings.
//!
//! Stores the values the timer engine reads at each phase boundary:
//! - Phase durations (focus, short break, long break)
//! - Sessions per long-break cycle
//! - Auto-start policy for breaks and work
//! - Daily session goal for the stats views
//!
//! Settings are stored at `<data dir>/config.toml` as a flat table.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Inclusive bounds for a numeric setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }
}

pub const FOCUS_BOUNDS: Bounds = Bounds::new(1, 90);
pub const SHORT_BREAK_BOUNDS: Bounds = Bounds::new(1, 30);
pub const LONG_BREAK_BOUNDS: Bounds = Bounds::new(1, 60);
pub const SESSIONS_BOUNDS: Bounds = Bounds::new(2, 8);
pub const DAILY_GOAL_BOUNDS: Bounds = Bounds::new(1, 20);

/// Timer settings.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_start_break: bool,
    #[serde(default)]
    pub auto_start_work: bool,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

// Default functions
fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_daily_goal() -> u32 {
    8
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_start_break: true,
            auto_start_work: false,
            daily_goal: default_daily_goal(),
        }
    }
}

impl Settings {
    /// Pull every numeric value into its allowed range.
    pub fn clamp(&mut self) {
        self.focus_minutes = FOCUS_BOUNDS.clamp(self.focus_minutes);
        self.short_break_minutes = SHORT_BREAK_BOUNDS.clamp(self.short_break_minutes);
        self.long_break_minutes = LONG_BREAK_BOUNDS.clamp(self.long_break_minutes);
        self.sessions_before_long_break =
            SESSIONS_BOUNDS.clamp(self.sessions_before_long_break);
        self.daily_goal = DAILY_GOAL_BOUNDS.clamp(self.daily_goal);
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut settings: Settings =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                settings.clamp();
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a value rendered as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        json.get(key).map(|v| v.to_string())
    }

    /// Set a value by key, clamping it to its bounds. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse as
    /// the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{message}, got '{value}'"),
        };
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| invalid("expected true or false"))?,
            ),
            _ => serde_json::Value::Number(
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| invalid("expected a non-negative integer"))?
                    .into(),
            ),
        };
        obj.insert(key.to_string(), new_value);

        *self = serde_json::from_value(json)?;
        self.clamp();
        Ok(())
    }

    /// All keys with their rendered values, in declaration order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let keys = [
            "focus_minutes",
            "short_break_minutes",
            "long_break_minutes",
            "sessions_before_long_break",
            "auto_start_break",
            "auto_start_work",
            "daily_goal",
        ];
        keys.iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v)))
            .collect()
    }
}
