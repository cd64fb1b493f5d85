//! # Pomotick Core Library
//!
//! This library provides the core logic for the Pomotick Pomodoro timer:
//! a phase state machine that survives process suspension, and the daily
//! statistics it feeds.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine. The driver calls
//!   `tick()` every second in the foreground and `reconcile()` after a
//!   suspension; backlogs of any length collapse into one completion.
//! - **Stats Ledger**: Per-day focus totals with today / week / streak views,
//!   shared copy-on-write between the engine and readers.
//! - **Settings**: TOML-backed durations and auto-start policy, read by the
//!   engine through [`SettingsProvider`] at each phase boundary.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`StatsLedger`]: Date-keyed session statistics
//! - [`Settings`]: Timer configuration
//! - [`Clock`]: Time source injected into the engine and ledger

pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use format::format_clock;
pub use settings::{SettingsProvider, SharedSettings};
pub use stats::{DailyStats, GoalProgress, SessionRecorder, StatsLedger, WeekSummary};
pub use storage::Settings;
pub use timer::{Phase, RunState, TimerEngine, TimerState};
