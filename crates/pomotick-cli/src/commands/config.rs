use clap::Subcommand;
use pomotick_core::{ConfigError, Settings};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "focus_minutes", "auto_start_break")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load()?;
            let value = settings.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(&key, &value)?;
            settings.save()?;
            // Echo what was stored, which may have been clamped.
            if let Some(stored) = settings.get(&key) {
                println!("{key} = {stored}");
            }
        }
        ConfigAction::List => {
            let settings = Settings::load()?;
            let json = serde_json::to_string_pretty(&settings)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let mut settings = Settings::load().unwrap_or_default();
            settings.reset_to_defaults();
            settings.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
