use std::sync::Arc;

use clap::Subcommand;
use pomotick_core::storage::{load_ledger, stats_path};
use pomotick_core::{Settings, StatsLedger, SystemClock};

const MAX_DAYS: i64 = 3_660;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions and daily goal progress
    Today,
    /// The last seven days with totals
    Week,
    /// Consecutive days with at least one session
    Streak,
    /// The last N days (at most ten years)
    Days {
        #[arg(default_value_t = 7, value_parser = clap::value_parser!(u32).range(0..=MAX_DAYS))]
        n: u32,
    },
}

fn open_ledger() -> Result<StatsLedger, Box<dyn std::error::Error>> {
    Ok(load_ledger(&stats_path()?, Arc::new(SystemClock))?)
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_ledger()?;

    match action {
        StatsAction::Today => {
            let settings = Settings::load()?;
            let out = serde_json::json!({
                "today": ledger.today(),
                "goal": ledger.goal_progress(settings.daily_goal),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Week => {
            let summary = ledger.week_summary();
            let mut out = serde_json::to_value(&summary)?;
            out["focus_hours"] = serde_json::json!(summary.focus_hours());
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Streak => {
            let out = serde_json::json!({ "streak": ledger.streak() });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Days { n } => {
            println!("{}", serde_json::to_string_pretty(&ledger.last_n_days(n as usize))?);
        }
    }
    Ok(())
}
