//! JSON persistence for the stats ledger.
//!
//! The file is a flat object keyed by `YYYY-MM-DD`, written in key order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::data_dir;
use crate::clock::Clock;
use crate::error::Result;
use crate::stats::{DailyStats, DayMap, StatsLedger};

/// `<data dir>/stats.json`
pub fn stats_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("stats.json"))
}

/// Read a ledger from `path`. A missing file is an empty ledger.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_ledger(path: &Path, clock: Arc<dyn Clock>) -> Result<StatsLedger> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StatsLedger::with_clock(clock));
        }
        Err(e) => return Err(e.into()),
    };

    let stored: BTreeMap<String, DailyStats> = serde_json::from_str(&content).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "stats file is not valid JSON");
        e
    })?;

    let days: DayMap = stored
        .into_iter()
        .map(|(key, mut day)| {
            day.date = key.clone();
            (key, day)
        })
        .collect();
    tracing::debug!(path = %path.display(), days = days.len(), "loaded stats ledger");
    Ok(StatsLedger::from_days(days, clock))
}

/// Write the ledger to `path` through a temp file and rename.
///
/// # Errors
/// Returns an error if serialization or any filesystem step fails.
pub fn save_ledger(ledger: &StatsLedger, path: &Path) -> Result<()> {
    let snapshot = ledger.snapshot();
    let ordered: BTreeMap<&String, &DailyStats> = snapshot.iter().collect();
    let content = serde_json::to_string_pretty(&ordered)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::NaiveDate;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::at_date(
            NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
        ))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = load_ledger(&dir.path().join("stats.json"), clock()).unwrap();
        assert!(ledger.snapshot().is_empty());
    }

    #[test]
    fn save_then_load_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        let ledger = StatsLedger::with_clock(clock());
        ledger.record_session(25);
        ledger.record_session_on(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), 50);
        save_ledger(&ledger, &path).unwrap();

        let loaded = load_ledger(&path, clock()).unwrap();
        assert_eq!(loaded.today().completed_focus_sessions, 1);
        assert_eq!(loaded.streak(), 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_is_a_flat_date_keyed_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        let ledger = StatsLedger::with_clock(clock());
        ledger.record_session(25);
        save_ledger(&ledger, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["2025-04-02"]["completed_focus_sessions"], 1);
        assert_eq!(json["2025-04-02"]["total_focus_minutes"], 25);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_ledger(&path, clock()).is_err());
    }

    #[test]
    fn key_wins_over_stored_date_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(
            &path,
            r#"{"2025-04-02": {"date": "bogus", "completed_focus_sessions": 2, "total_focus_minutes": 50}}"#,
        )
        .unwrap();
        let ledger = load_ledger(&path, clock()).unwrap();
        assert_eq!(ledger.today().date, "2025-04-02");
        assert_eq!(ledger.today().completed_focus_sessions, 2);
    }
}
