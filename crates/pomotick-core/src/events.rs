use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerState};

/// Every timer transition produces an Event.
/// The driver prints them; a no-op transition produces none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        session: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// The user jumped to the next phase. Nothing was recorded.
    TimerSkipped {
        from: Phase,
        to: Phase,
        session: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    /// A phase ran out, either on a tick or during reconciliation.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        session: u32,
        /// Minutes written to the stats ledger, if the phase was focus.
        recorded_minutes: Option<u32>,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the events that move the timer into a new phase.
    pub fn is_phase_change(&self) -> bool {
        matches!(
            self,
            Event::TimerSkipped { .. } | Event::PhaseCompleted { .. }
        )
    }
}
