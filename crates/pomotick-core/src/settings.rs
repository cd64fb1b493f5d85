//! Read-only settings contract consumed by the timer engine.
//!
//! The engine never caches these values: every duration or auto-start
//! decision asks the provider again, so an edit made mid-phase shows up at
//! the next phase boundary.

use std::sync::{Arc, RwLock};

use crate::storage::Settings;

pub trait SettingsProvider: Send + Sync {
    fn focus_minutes(&self) -> u32;
    fn short_break_minutes(&self) -> u32;
    fn long_break_minutes(&self) -> u32;
    fn sessions_before_long_break(&self) -> u32;
    fn auto_start_break(&self) -> bool;
    fn auto_start_work(&self) -> bool;
}

impl SettingsProvider for Settings {
    fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }
    fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }
    fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }
    fn sessions_before_long_break(&self) -> u32 {
        self.sessions_before_long_break
    }
    fn auto_start_break(&self) -> bool {
        self.auto_start_break
    }
    fn auto_start_work(&self) -> bool {
        self.auto_start_work
    }
}

/// Settings shared between the engine and whoever edits them.
///
/// Cloning shares the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copy of the current values.
    pub fn get(&self) -> Settings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply an edit. Values are clamped to their bounds afterwards.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
        guard.clamp();
    }

    pub fn replace(&self, settings: Settings) {
        self.update(|current| *current = settings);
    }

    fn read<T>(&self, f: impl FnOnce(&Settings) -> T) -> T {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

impl SettingsProvider for SharedSettings {
    fn focus_minutes(&self) -> u32 {
        self.read(|s| s.focus_minutes)
    }
    fn short_break_minutes(&self) -> u32 {
        self.read(|s| s.short_break_minutes)
    }
    fn long_break_minutes(&self) -> u32 {
        self.read(|s| s.long_break_minutes)
    }
    fn sessions_before_long_break(&self) -> u32 {
        self.read(|s| s.sessions_before_long_break)
    }
    fn auto_start_break(&self) -> bool {
        self.read(|s| s.auto_start_break)
    }
    fn auto_start_work(&self) -> bool {
        self.read(|s| s.auto_start_work)
    }
}
