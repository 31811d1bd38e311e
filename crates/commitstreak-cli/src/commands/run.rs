use chrono::{Local, NaiveDate};
use clap::Args;
use commitstreak_core::{
    Config, CoreError, DailyJob, DatabaseError, GitHubCommitSource, RunReport, TelegramNotifier,
};

use super::open_database;

#[derive(Args)]
pub struct RunArgs {
    /// Day to report (YYYY-MM-DD); defaults to today in local time
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let source = GitHubCommitSource::new(&config.github)?;
    let notifier = TelegramNotifier::new(&config.telegram)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // A bad token must stop the run before GitHub is queried or the history is opened.
    let bot = runtime.block_on(notifier.authorize())?;
    tracing::info!(bot = %bot, "bot authorized");

    let db = open_database(&config)?;
    let outcome = runtime.block_on(DailyJob::new(&db, source, notifier).run(date));
    let report = settle(outcome, db.close())?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Combine the job result with the store's close result.
///
/// The message has already gone out once the job succeeds, so a close
/// failure is only logged. A job error always wins.
fn settle(
    outcome: Result<RunReport, CoreError>,
    closed: Result<(), DatabaseError>,
) -> Result<RunReport, CoreError> {
    if let Err(e) = closed {
        tracing::warn!(error = %e, "failed to close history database");
    }
    outcome
}
