//! One invocation of the daily report: fetch, compute, persist, notify.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::integrations::{CommitSource, Notifier};
use crate::message::{render, Report};
use crate::storage::{AggregateStats, Database};
use crate::streak::{CommitCount, StreakDecision, StreakEngine};

/// What happened during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub date: NaiveDate,
    pub commits: CommitCount,
    pub streak: u32,
    /// `false` when nothing was written: either the count was unknown or
    /// the write itself failed.
    pub persisted: bool,
    pub stats: Option<AggregateStats>,
    pub message: String,
}

/// Runs the report for a single day against a borrowed store.
pub struct DailyJob<'a, S, N> {
    db: &'a Database,
    source: S,
    notifier: N,
    engine: StreakEngine,
}

impl<'a, S, N> DailyJob<'a, S, N>
where
    S: CommitSource,
    N: Notifier,
{
    pub fn new(db: &'a Database, source: S, notifier: N) -> Self {
        Self {
            db,
            source,
            notifier,
            engine: StreakEngine::new(),
        }
    }

    /// Run the job for `date`.
    ///
    /// A source failure is not an error here: the day is reported as
    /// unknown and the store is left alone. Reading the store is fatal on
    /// failure; writing it is logged and the message still goes out.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or the message cannot
    /// be delivered.
    pub async fn run(&self, date: NaiveDate) -> Result<RunReport> {
        let commits = match self.source.commit_count(date).await {
            Ok(n) => {
                tracing::info!(source = self.source.name(), %date, commits = n, "fetched commit count");
                CommitCount::Known(n)
            }
            Err(e) => {
                tracing::warn!(source = self.source.name(), %date, error = %e, "commit count unavailable");
                CommitCount::Unknown
            }
        };

        let previous = self.db.latest_record_before(date)?;
        let previous_streak = previous.as_ref().map_or(0, |r| r.streak);

        let (streak, persisted) = match self.engine.advance(date, commits, previous.as_ref()) {
            StreakDecision::Persist {
                date,
                commit_count,
                streak,
            } => match self.db.upsert(date, commit_count, streak) {
                Ok(()) => {
                    tracing::info!(%date, commit_count, streak, "recorded day");
                    (streak, true)
                }
                Err(e) => {
                    tracing::error!(%date, error = %e, "failed to persist day; store is now behind");
                    (streak, false)
                }
            },
            StreakDecision::Skip => {
                let stored = self.db.record_for_date(date)?;
                let streak = stored.map_or(previous_streak, |r| r.streak);
                tracing::info!(%date, streak, "left history untouched");
                (streak, false)
            }
        };

        let stats = match self.db.aggregate_stats() {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(error = %e, "aggregate stats unavailable; sending without them");
                None
            }
        };

        let message = render(&Report {
            commits,
            streak,
            previous_streak,
            stats,
        });

        self.notifier.send(&message).await?;
        tracing::info!(notifier = self.notifier.name(), streak, "summary sent");

        Ok(RunReport {
            date,
            commits,
            streak,
            persisted,
            stats,
            message,
        })
    }
}
