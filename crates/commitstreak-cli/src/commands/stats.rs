use chrono::NaiveDate;
use clap::Subcommand;
use commitstreak_core::Config;

use super::open_database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Record for a single day
    Day {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// All-time totals and streaks
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_database(&Config::resolve()?)?;

    match action {
        StatsAction::Day { date } => {
            let record = db.record_for_date(date)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        StatsAction::All => {
            let stats = db.aggregate_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
