//! Focus statistics.
//!
//! The [`StatsLedger`] accumulates completed focus sessions per local
//! calendar day and derives the today / week / streak views from that map.

mod ledger;

pub use ledger::{
    day_key, DailyStats, DayMap, GoalProgress, SessionRecorder, StatsLedger, WeekSummary,
    STREAK_WINDOW_DAYS,
};
