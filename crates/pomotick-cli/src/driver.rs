//! Foreground driver: the only caller of the engine's time-based methods.
//!
//! A heartbeat arrives about once a second. If the wall clock moved much
//! further than that since the previous heartbeat, the process was stopped
//! or the machine slept, and the engine is reconciled instead of ticked.

use std::path::PathBuf;
use std::sync::Arc;

use pomotick_core::storage::save_ledger;
use pomotick_core::{Clock, Event, StatsLedger, TimerEngine};

/// Wall-clock gap between heartbeats that counts as a suspension.
pub const RESUME_GAP_MS: i64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    Start,
    Pause,
    Resume,
    Skip,
    Reset,
    Status,
    Quit,
}

impl DriverCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "g" | "start" => Some(Self::Start),
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "s" | "skip" => Some(Self::Skip),
            "x" | "reset" => Some(Self::Reset),
            "" | "?" | "status" => Some(Self::Status),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub struct Driver {
    engine: TimerEngine,
    ledger: Arc<StatsLedger>,
    clock: Arc<dyn Clock>,
    stats_path: PathBuf,
    last_beat_ms: i64,
}

impl Driver {
    pub fn new(
        engine: TimerEngine,
        ledger: Arc<StatsLedger>,
        clock: Arc<dyn Clock>,
        stats_path: PathBuf,
    ) -> Self {
        let last_beat_ms = clock.now_ms();
        Self {
            engine,
            ledger,
            clock,
            stats_path,
            last_beat_ms,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Advance the engine by one heartbeat.
    pub fn heartbeat(&mut self) -> Result<Option<Event>, pomotick_core::CoreError> {
        let now = self.clock.now_ms();
        let gap = now.saturating_sub(self.last_beat_ms);
        self.last_beat_ms = now;

        let event = if gap >= RESUME_GAP_MS {
            tracing::debug!(gap_ms = gap, "heartbeat gap, reconciling");
            self.engine.reconcile()
        } else {
            self.engine.tick()
        };
        self.after(event)
    }

    /// Apply a user command. `Quit` is left to the caller.
    pub fn command(
        &mut self,
        command: DriverCommand,
    ) -> Result<Option<Event>, pomotick_core::CoreError> {
        // Bring the countdown up to date before pausing or skipping.
        let caught_up = self.engine.reconcile();
        self.after(caught_up.clone())?;
        if caught_up.is_some() {
            return Ok(caught_up);
        }

        let event = match command {
            DriverCommand::Start => self.engine.start(),
            DriverCommand::Pause => self.engine.pause(),
            DriverCommand::Resume => self.engine.resume(),
            DriverCommand::Skip => self.engine.skip(),
            DriverCommand::Reset => self.engine.reset(),
            DriverCommand::Status => Some(self.engine.snapshot()),
            DriverCommand::Quit => None,
        };
        self.after(event)
    }

    /// Write the ledger to disk.
    pub fn persist(&self) -> Result<(), pomotick_core::CoreError> {
        save_ledger(&self.ledger, &self.stats_path)
    }

    /// One-line status for the terminal.
    pub fn status_line(&self) -> String {
        let state = self.engine().state();
        let mode = if state.running {
            ""
        } else if state.paused {
            " (paused)"
        } else {
            " (idle)"
        };
        format!(
            "{} #{} {}{}",
            state.phase,
            state.current_session,
            state.clock(),
            mode
        )
    }

    fn after(&self, event: Option<Event>) -> Result<Option<Event>, pomotick_core::CoreError> {
        if let Some(Event::PhaseCompleted {
            recorded_minutes: Some(_),
            ..
        }) = &event
        {
            self.persist()?;
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotick_core::{ManualClock, Phase, Settings, SharedSettings};

    fn driver(settings: Settings) -> (Driver, Arc<ManualClock>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(1_718_000_000_000));
        let ledger = Arc::new(StatsLedger::with_clock(clock.clone()));
        let engine = TimerEngine::new(
            Arc::new(SharedSettings::new(settings)),
            ledger.clone(),
            clock.clone(),
        );
        let driver = Driver::new(engine, ledger, clock.clone(), dir.path().join("stats.json"));
        (driver, clock, dir)
    }

    #[test]
    fn parse_commands() {
        assert_eq!(DriverCommand::parse("p"), Some(DriverCommand::Pause));
        assert_eq!(DriverCommand::parse(" resume\n"), Some(DriverCommand::Resume));
        assert_eq!(DriverCommand::parse("q"), Some(DriverCommand::Quit));
        assert_eq!(DriverCommand::parse("dance"), None);
    }

    #[test]
    fn regular_heartbeat_ticks() {
        let (mut d, clock, _dir) = driver(Settings::default());
        d.command(DriverCommand::Start).unwrap();
        for _ in 0..3 {
            clock.advance_secs(1);
            d.heartbeat().unwrap();
        }
        assert_eq!(d.engine().remaining_secs(), 1497);
    }

    #[test]
    fn heartbeat_after_gap_reconciles() {
        let (mut d, clock, _dir) = driver(Settings::default());
        d.command(DriverCommand::Start).unwrap();
        clock.advance_secs(1);
        d.heartbeat().unwrap();

        clock.advance_secs(120);
        d.heartbeat().unwrap();
        assert_eq!(d.engine().remaining_secs(), 1500 - 121);
    }

    #[test]
    fn completion_persists_ledger() {
        let (mut d, clock, dir) = driver(Settings::default());
        d.command(DriverCommand::Start).unwrap();
        clock.advance_secs(1500);
        let event = d.heartbeat().unwrap();
        assert!(matches!(event, Some(Event::PhaseCompleted { .. })));
        assert_eq!(d.engine().phase(), Phase::ShortBreak);

        let saved = std::fs::read_to_string(dir.path().join("stats.json")).unwrap();
        assert!(saved.contains("\"completed_focus_sessions\": 1"));
    }

    #[test]
    fn pause_catches_up_first() {
        let (mut d, clock, _dir) = driver(Settings::default());
        d.command(DriverCommand::Start).unwrap();
        clock.advance_secs(45);
        d.command(DriverCommand::Pause).unwrap();
        assert_eq!(d.engine().remaining_secs(), 1455);
        assert!(d.engine().state().paused);
    }

    #[test]
    fn status_line_shows_phase_and_clock() {
        let (d, _clock, _dir) = driver(Settings::default());
        assert_eq!(d.status_line(), "Focus #1 25:00 (idle)");
    }
}
