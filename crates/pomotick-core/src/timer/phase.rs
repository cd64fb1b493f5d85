use serde::{Deserialize, Serialize};

use crate::settings::SettingsProvider;

/// The interval type the timer is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Focus)
    }

    /// Configured length of this phase in minutes.
    pub fn duration_min(self, settings: &dyn SettingsProvider) -> u32 {
        match self {
            Phase::Focus => settings.focus_minutes(),
            Phase::ShortBreak => settings.short_break_minutes(),
            Phase::LongBreak => settings.long_break_minutes(),
        }
    }

    /// Configured length of this phase in seconds.
    pub fn duration_secs(self, settings: &dyn SettingsProvider) -> u64 {
        u64::from(self.duration_min(settings)).saturating_mul(60)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the cycle goes after the current phase ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAdvance {
    pub phase: Phase,
    pub session: u32,
    pub total_secs: u64,
    pub auto_start: bool,
}

/// Next phase, session number, duration and auto-start decision.
///
/// Focus leads to a long break once `session` reaches the configured cycle
/// length, otherwise to a short break; the session number is kept either
/// way. A short break leads to the next focus session. A long break always
/// restarts the cycle at session 1.
pub fn advance_phase(phase: Phase, session: u32, settings: &dyn SettingsProvider) -> PhaseAdvance {
    let (next, session) = match phase {
        Phase::Focus if session >= settings.sessions_before_long_break() => {
            (Phase::LongBreak, session)
        }
        Phase::Focus => (Phase::ShortBreak, session),
        Phase::LongBreak => (Phase::Focus, 1),
        Phase::ShortBreak => (Phase::Focus, session.saturating_add(1)),
    };

    let auto_start = if next.is_break() {
        settings.auto_start_break()
    } else {
        settings.auto_start_work()
    };

    PhaseAdvance {
        phase: next,
        session,
        total_secs: next.duration_secs(settings),
        auto_start,
    }
}
