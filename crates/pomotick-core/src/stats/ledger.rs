//! Date-keyed accumulation of completed focus sessions.
//!
//! The ledger is one map from local calendar date to [`DailyStats`]. It only
//! grows: the single write path upserts today's entry. Every view (today,
//! last N days, streak, week summary) is derived from the map on demand.
//!
//! Writes are copy-on-write: the map lives behind an `Arc`, a write clones
//! it, mutates the clone and swaps the pointer. A reader holding an older
//! snapshot never observes a half-applied update.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};

/// Map from `YYYY-MM-DD` key to that day's totals.
pub type DayMap = HashMap<String, DailyStats>;

/// How far back `streak` looks.
pub const STREAK_WINDOW_DAYS: u32 = 365;

const MAX_RESERVED_DAYS: usize = 366;

/// Focus totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    pub completed_focus_sessions: u32,
    pub total_focus_minutes: u32,
}

impl DailyStats {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            completed_focus_sessions: 0,
            total_focus_minutes: 0,
        }
    }
}

/// Format a date the way ledger keys are written.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Receives completed focus sessions from the timer engine.
pub trait SessionRecorder: Send + Sync {
    fn record_session(&self, duration_minutes: u32);
}

/// Last seven days plus the totals shown alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
    /// Oldest first, ending today.
    pub days: Vec<DailyStats>,
    pub total_sessions: u32,
    pub total_minutes: u32,
    /// Highest daily session count in the window, never below 1 so it can
    /// be used as a chart scale.
    pub busiest_day_sessions: u32,
}

impl WeekSummary {
    /// Total focus time in hours, rounded to one decimal.
    pub fn focus_hours(&self) -> f64 {
        (f64::from(self.total_minutes) / 60.0 * 10.0).round() / 10.0
    }
}

/// Today's sessions measured against the daily goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal: u32,
    pub completed: u32,
    pub reached: bool,
    /// 0.0 ..= 1.0
    pub fraction: f64,
}

pub struct StatsLedger {
    days: RwLock<Arc<DayMap>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for StatsLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsLedger")
            .field("days", &self.snapshot().len())
            .finish_non_exhaustive()
    }
}

impl Default for StatsLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsLedger {
    /// Empty ledger keyed by the local system date.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::from_days(DayMap::new(), clock)
    }

    pub fn from_days(days: DayMap, clock: Arc<dyn Clock>) -> Self {
        Self {
            days: RwLock::new(Arc::new(days)),
            clock,
        }
    }

    /// Immutable view of every entry at this instant.
    pub fn snapshot(&self) -> Arc<DayMap> {
        match self.days.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Add one completed focus session to today's entry.
    pub fn record_session(&self, duration_minutes: u32) {
        self.record_session_on(self.clock.today(), duration_minutes);
    }

    /// Add one completed focus session to the entry for `date`.
    pub fn record_session_on(&self, date: NaiveDate, duration_minutes: u32) {
        let key = day_key(date);
        let mut guard = match self.days.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut next = DayMap::clone(&guard);
        let entry = next
            .entry(key.clone())
            .or_insert_with(|| DailyStats::empty(key));
        entry.completed_focus_sessions = entry.completed_focus_sessions.saturating_add(1);
        entry.total_focus_minutes = entry.total_focus_minutes.saturating_add(duration_minutes);
        tracing::debug!(
            date = %entry.date,
            sessions = entry.completed_focus_sessions,
            minutes = entry.total_focus_minutes,
            "recorded focus session"
        );

        *guard = Arc::new(next);
    }

    /// Entry for `date`, zero-valued if absent. Never inserts.
    pub fn day(&self, date: NaiveDate) -> DailyStats {
        let key = day_key(date);
        self.snapshot()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| DailyStats::empty(key))
    }

    pub fn today(&self) -> DailyStats {
        self.day(self.clock.today())
    }

    /// Exactly `n` entries for the `n` days ending today, oldest first.
    ///
    /// The walk stops at the earliest representable date, so a window
    /// reaching past it is shorter than `n`.
    pub fn last_n_days(&self, n: usize) -> Vec<DailyStats> {
        let days = self.snapshot();
        let today = self.clock.today();

        let mut out = Vec::with_capacity(n.min(MAX_RESERVED_DAYS));
        let mut date = Some(today);
        for _ in 0..n {
            let Some(current) = date else { break };
            let key = day_key(current);
            out.push(
                days.get(&key)
                    .cloned()
                    .unwrap_or_else(|| DailyStats::empty(key)),
            );
            date = current.pred_opt();
        }
        out.reverse();
        out
    }

    /// The seven days ending today.
    pub fn week(&self) -> Vec<DailyStats> {
        self.last_n_days(7)
    }

    /// Consecutive days with at least one session, counted back from today.
    ///
    /// Today is a grace day: having no sessions yet today does not end the
    /// walk, so a run that reached yesterday still counts. Any earlier day
    /// without sessions ends it. Only the last `STREAK_WINDOW_DAYS` days are
    /// examined.
    pub fn streak(&self) -> u32 {
        let days = self.snapshot();
        let mut streak = 0;
        let mut current = self.clock.today();

        for offset in 0..STREAK_WINDOW_DAYS {
            let sessions = days
                .get(&day_key(current))
                .map(|d| d.completed_focus_sessions)
                .unwrap_or(0);

            if sessions > 0 {
                streak += 1;
            } else if offset > 0 {
                break;
            }

            match current.pred_opt() {
                Some(prev) => current = prev,
                None => break,
            }
        }

        streak
    }

    pub fn week_summary(&self) -> WeekSummary {
        let days = self.week();
        let total_sessions = days.iter().map(|d| d.completed_focus_sessions).sum();
        let total_minutes = days.iter().map(|d| d.total_focus_minutes).sum();
        let busiest_day_sessions = days
            .iter()
            .map(|d| d.completed_focus_sessions)
            .max()
            .unwrap_or(0)
            .max(1);

        WeekSummary {
            days,
            total_sessions,
            total_minutes,
            busiest_day_sessions,
        }
    }

    pub fn goal_progress(&self, daily_goal: u32) -> GoalProgress {
        let completed = self.today().completed_focus_sessions;
        let fraction = if daily_goal == 0 {
            1.0
        } else {
            (f64::from(completed) / f64::from(daily_goal)).min(1.0)
        };
        GoalProgress {
            goal: daily_goal,
            completed,
            reached: completed >= daily_goal,
            fraction,
        }
    }
}

impl SessionRecorder for StatsLedger {
    fn record_session(&self, duration_minutes: u32) {
        StatsLedger::record_session(self, duration_minutes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger_on(today: NaiveDate) -> StatsLedger {
        StatsLedger::with_clock(Arc::new(ManualClock::at_date(today)))
    }

    #[test]
    fn record_session_upserts_today() {
        let ledger = ledger_on(date(2025, 3, 10));
        ledger.record_session(25);
        ledger.record_session(30);

        let today = ledger.today();
        assert_eq!(today.date, "2025-03-10");
        assert_eq!(today.completed_focus_sessions, 2);
        assert_eq!(today.total_focus_minutes, 55);
        assert_eq!(ledger.snapshot().len(), 1);
    }

    #[test]
    fn today_does_not_insert() {
        let ledger = ledger_on(date(2025, 3, 10));
        let today = ledger.today();
        assert_eq!(today, DailyStats::empty("2025-03-10"));
        assert!(ledger.snapshot().is_empty());
    }

    #[test]
    fn snapshot_is_not_changed_by_later_writes() {
        let ledger = ledger_on(date(2025, 3, 10));
        ledger.record_session(25);
        let before = ledger.snapshot();
        ledger.record_session(25);
        assert_eq!(before["2025-03-10"].completed_focus_sessions, 1);
        assert_eq!(ledger.snapshot()["2025-03-10"].completed_focus_sessions, 2);
    }

    #[test]
    fn last_n_days_is_ordered_and_zero_filled() {
        let ledger = ledger_on(date(2025, 3, 2));
        ledger.record_session_on(date(2025, 2, 27), 25);
        ledger.record_session_on(date(2025, 3, 2), 50);
        // Outside the window.
        ledger.record_session_on(date(2025, 2, 1), 25);

        let days = ledger.last_n_days(7);
        let keys: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            keys,
            [
                "2025-02-24",
                "2025-02-25",
                "2025-02-26",
                "2025-02-27",
                "2025-02-28",
                "2025-03-01",
                "2025-03-02",
            ]
        );
        assert_eq!(days[3].completed_focus_sessions, 1);
        assert_eq!(days[6].total_focus_minutes, 50);
        assert_eq!(days[0].completed_focus_sessions, 0);
    }

    #[test]
    fn last_zero_days_is_empty() {
        let ledger = ledger_on(date(2025, 3, 2));
        assert!(ledger.last_n_days(0).is_empty());
    }

    #[test]
    fn last_n_days_with_huge_n_stops_at_earliest_date() {
        let earliest = NaiveDate::MIN;
        let today = earliest.succ_opt().and_then(|d| d.succ_opt()).unwrap();
        let ledger = ledger_on(today);
        ledger.record_session(25);

        let days = ledger.last_n_days(usize::MAX);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, day_key(earliest));
        assert_eq!(days[2].completed_focus_sessions, 1);
    }

    #[test]
    fn streak_looks_back_at_most_a_year() {
        let today = date(2025, 6, 15);
        let ledger = ledger_on(today);
        let mut day = today;
        for _ in 0..400 {
            ledger.record_session_on(day, 25);
            day = day.pred_opt().unwrap();
        }
        assert_eq!(ledger.streak(), STREAK_WINDOW_DAYS);
    }

    #[test]
    fn streak_counts_consecutive_days_including_today() {
        let ledger = ledger_on(date(2025, 6, 15));
        ledger.record_session_on(date(2025, 6, 15), 25);
        ledger.record_session_on(date(2025, 6, 14), 25);
        ledger.record_session_on(date(2025, 6, 13), 25);
        assert_eq!(ledger.streak(), 3);
    }

    #[test]
    fn streak_stops_at_missing_yesterday() {
        let ledger = ledger_on(date(2025, 6, 15));
        ledger.record_session_on(date(2025, 6, 15), 25);
        ledger.record_session_on(date(2025, 6, 13), 25);
        assert_eq!(ledger.streak(), 1);
    }

    #[test]
    fn streak_survives_empty_today() {
        let ledger = ledger_on(date(2025, 6, 15));
        ledger.record_session_on(date(2025, 6, 14), 25);
        ledger.record_session_on(date(2025, 6, 13), 25);
        assert_eq!(ledger.streak(), 2);
    }

    #[test]
    fn streak_is_zero_without_today_or_yesterday() {
        let ledger = ledger_on(date(2025, 6, 15));
        ledger.record_session_on(date(2025, 6, 13), 25);
        assert_eq!(ledger.streak(), 0);
        assert_eq!(ledger_on(date(2025, 6, 15)).streak(), 0);
    }

    #[test]
    fn streak_ignores_zero_session_entries() {
        let mut days = DayMap::new();
        days.insert("2025-06-14".into(), DailyStats::empty("2025-06-14"));
        let clock = Arc::new(ManualClock::at_date(date(2025, 6, 15)));
        let ledger = StatsLedger::from_days(days, clock);
        ledger.record_session_on(date(2025, 6, 15), 25);
        ledger.record_session_on(date(2025, 6, 13), 25);
        assert_eq!(ledger.streak(), 1);
    }

    #[test]
    fn week_summary_totals() {
        let ledger = ledger_on(date(2025, 6, 15));
        ledger.record_session_on(date(2025, 6, 15), 25);
        ledger.record_session_on(date(2025, 6, 15), 25);
        ledger.record_session_on(date(2025, 6, 10), 40);

        let summary = ledger.week_summary();
        assert_eq!(summary.days.len(), 7);
        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.total_minutes, 90);
        assert_eq!(summary.busiest_day_sessions, 2);
        assert_eq!(summary.focus_hours(), 1.5);
    }

    #[test]
    fn empty_week_scale_is_one() {
        assert_eq!(ledger_on(date(2025, 6, 15)).week_summary().busiest_day_sessions, 1);
    }

    #[test]
    fn goal_progress_caps_at_one() {
        let ledger = ledger_on(date(2025, 6, 15));
        for _ in 0..3 {
            ledger.record_session(25);
        }
        let progress = ledger.goal_progress(2);
        assert!(progress.reached);
        assert_eq!(progress.fraction, 1.0);

        let progress = ledger.goal_progress(6);
        assert!(!progress.reached);
        assert_eq!(progress.fraction, 0.5);
    }

    #[test]
    fn date_rollover_starts_new_entry() {
        let clock = Arc::new(ManualClock::at_date(date(2025, 12, 31)));
        let ledger = StatsLedger::with_clock(clock.clone());
        ledger.record_session(25);
        clock.advance_days(1);
        ledger.record_session(25);

        assert_eq!(ledger.today().date, "2026-01-01");
        assert_eq!(ledger.today().completed_focus_sessions, 1);
        assert_eq!(ledger.streak(), 2);
    }
}
