//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the driver calls `tick()` once a second while in the
//! foreground and `reconcile()` when it comes back from being suspended.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> phase completion
//! phase completion -> Running (auto-start) | Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(settings, ledger, Arc::new(SystemClock));
//! engine.start();
//! // Every second while in the foreground:
//! engine.tick(); // Returns Some(Event::PhaseCompleted) when the phase ends
//! // After the process was suspended:
//! engine.reconcile();
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{advance_phase, Phase};
use crate::clock::Clock;
use crate::events::Event;
use crate::format::format_clock;
use crate::settings::SettingsProvider;
use crate::stats::SessionRecorder;

/// Whether the countdown is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RunState {
    Idle,
    /// `started_at_ms` is the virtual start of the current run: shifted back
    /// by whatever was already consumed before a pause.
    Running { started_at_ms: i64 },
    Paused,
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub running: bool,
    pub paused: bool,
    pub current_session: u32,
    pub completed_focus_count: u32,
    /// Epoch milliseconds; set exactly when `running`.
    pub start_timestamp_ms: Option<i64>,
}

impl TimerState {
    /// 0.0 .. 1.0 of the current phase already consumed.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_seconds as f64 / self.total_seconds as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    pub fn is_idle(&self) -> bool {
        !self.running && !self.paused
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Expired,
    Skipped,
}

/// Core timer engine.
///
/// Operates on wall-clock time read through the injected [`Clock`]. Settings
/// are re-read at every phase boundary, never cached. Completed focus
/// phases are reported to the [`SessionRecorder`].
pub struct TimerEngine {
    settings: Arc<dyn SettingsProvider>,
    recorder: Arc<dyn SessionRecorder>,
    clock: Arc<dyn Clock>,
    phase: Phase,
    run: RunState,
    remaining_secs: u64,
    total_secs: u64,
    current_session: u32,
    completed_focus_count: u32,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("phase", &self.phase)
            .field("run", &self.run)
            .field("remaining_secs", &self.remaining_secs)
            .field("total_secs", &self.total_secs)
            .field("current_session", &self.current_session)
            .field("completed_focus_count", &self.completed_focus_count)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create an idle engine at the first focus session of a cycle.
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        recorder: Arc<dyn SessionRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let total_secs = Phase::Focus.duration_secs(settings.as_ref());
        Self {
            settings,
            recorder,
            clock,
            phase: Phase::Focus,
            run: RunState::Idle,
            remaining_secs: total_secs,
            total_secs,
            current_session: 1,
            completed_focus_count: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn current_session(&self) -> u32 {
        self.current_session
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run, RunState::Running { .. })
    }

    pub fn state(&self) -> TimerState {
        let start_timestamp_ms = match self.run {
            RunState::Running { started_at_ms } => Some(started_at_ms),
            _ => None,
        };
        TimerState {
            phase: self.phase,
            remaining_seconds: self.remaining_secs,
            total_seconds: self.total_secs,
            running: start_timestamp_ms.is_some(),
            paused: self.run == RunState::Paused,
            current_session: self.current_session,
            completed_focus_count: self.completed_focus_count,
            start_timestamp_ms,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            at: self.at(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the current phase from its full duration.
    ///
    /// While paused this resumes instead; while running it does nothing.
    pub fn start(&mut self) -> Option<Event> {
        match self.run {
            RunState::Idle => {
                let total = self.phase.duration_secs(self.settings.as_ref());
                self.total_secs = total;
                self.remaining_secs = total;
                self.run = RunState::Running {
                    started_at_ms: self.clock.now_ms(),
                };
                tracing::debug!(phase = %self.phase, total, "timer started");
                Some(Event::TimerStarted {
                    phase: self.phase,
                    session: self.current_session,
                    duration_secs: total,
                    at: self.at(),
                })
            }
            RunState::Paused => self.resume(),
            RunState::Running { .. } => None,
        }
    }

    /// Freeze the countdown at the last ticked or reconciled value.
    pub fn pause(&mut self) -> Option<Event> {
        match self.run {
            RunState::Running { .. } => {
                self.run = RunState::Paused;
                tracing::debug!(remaining = self.remaining_secs, "timer paused");
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: self.at(),
                })
            }
            _ => None,
        }
    }

    /// Continue a paused phase.
    ///
    /// The run's start instant is placed in the past by the time already
    /// consumed, so `reconcile()` keeps measuring from the phase's origin.
    /// From idle this behaves as `start()`.
    pub fn resume(&mut self) -> Option<Event> {
        match self.run {
            RunState::Paused => {
                let consumed_ms = self
                    .total_secs
                    .saturating_sub(self.remaining_secs)
                    .saturating_mul(1000);
                let consumed_ms = i64::try_from(consumed_ms).unwrap_or(i64::MAX);
                self.run = RunState::Running {
                    started_at_ms: self.clock.now_ms().saturating_sub(consumed_ms),
                };
                tracing::debug!(remaining = self.remaining_secs, "timer resumed");
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: self.at(),
                })
            }
            RunState::Idle => self.start(),
            RunState::Running { .. } => None,
        }
    }

    /// Stop and refill the current phase. Phase and session stay put.
    pub fn reset(&mut self) -> Option<Event> {
        let total = self.phase.duration_secs(self.settings.as_ref());
        self.total_secs = total;
        self.remaining_secs = total;
        self.run = RunState::Idle;
        tracing::debug!(phase = %self.phase, "timer reset");
        Some(Event::TimerReset {
            phase: self.phase,
            at: self.at(),
        })
    }

    /// Jump to the next phase without recording the current one.
    pub fn skip(&mut self) -> Option<Event> {
        Some(self.complete_phase(Completion::Skipped))
    }

    /// One-second heartbeat. Returns `Some(Event::PhaseCompleted)` when the
    /// phase runs out.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }
        Some(self.complete_phase(Completion::Expired))
    }

    /// Catch up with wall-clock time after the process was suspended.
    ///
    /// However long the gap, this is one computation and at most one phase
    /// completion; missed seconds are never replayed.
    pub fn reconcile(&mut self) -> Option<Event> {
        let RunState::Running { started_at_ms } = self.run else {
            return None;
        };

        let elapsed_ms = self.clock.now_ms().saturating_sub(started_at_ms).max(0);
        let elapsed_secs = u64::try_from(elapsed_ms / 1000).unwrap_or(0);
        let remaining = self.total_secs.saturating_sub(elapsed_secs);

        if remaining == 0 {
            tracing::debug!(elapsed_secs, "phase ran out while suspended");
            return Some(self.complete_phase(Completion::Expired));
        }
        self.remaining_secs = remaining;
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self, how: Completion) -> Event {
        let from = self.phase;
        let settings = self.settings.as_ref();

        let mut recorded_minutes = None;
        if from == Phase::Focus {
            self.completed_focus_count = self.completed_focus_count.saturating_add(1);
            if how == Completion::Expired {
                let minutes = settings.focus_minutes();
                self.recorder.record_session(minutes);
                recorded_minutes = Some(minutes);
            }
        }

        let next = advance_phase(from, self.current_session, settings);
        self.phase = next.phase;
        self.current_session = next.session;
        self.total_secs = next.total_secs;
        self.remaining_secs = next.total_secs;
        self.run = if next.auto_start {
            RunState::Running {
                started_at_ms: self.clock.now_ms(),
            }
        } else {
            RunState::Idle
        };

        let at = self.at();
        match how {
            Completion::Expired => {
                tracing::info!(
                    from = %from,
                    to = %next.phase,
                    session = next.session,
                    auto_started = next.auto_start,
                    "phase completed"
                );
                Event::PhaseCompleted {
                    from,
                    to: next.phase,
                    session: next.session,
                    recorded_minutes,
                    auto_started: next.auto_start,
                    at,
                }
            }
            Completion::Skipped => {
                tracing::debug!(from = %from, to = %next.phase, "phase skipped");
                Event::TimerSkipped {
                    from,
                    to: next.phase,
                    session: next.session,
                    auto_started: next.auto_start,
                    at,
                }
            }
        }
    }

    fn at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.clock.now_ms()).unwrap_or_default()
    }
}
