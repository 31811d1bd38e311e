//! Streak accounting.
//!
//! Turns today's commit count and the previous [`DailyRecord`] into today's
//! streak value. Nothing here touches storage or the network; the caller
//! looks up the predecessor and persists the decision.
//!
//! The predecessor is the most recent stored day before today, not strictly
//! the calendar yesterday. A day with no run at all leaves no record, so the
//! gap is invisible here and the streak carries over it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::DailyRecord;

/// Outcome of asking the commit source for today's count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommitCount {
    /// The source answered with a verified count (which may be zero).
    Known(u32),
    /// The source could not be queried. Never stored.
    Unknown,
}

impl CommitCount {
    pub fn known(self) -> Option<u32> {
        match self {
            CommitCount::Known(n) => Some(n),
            CommitCount::Unknown => None,
        }
    }
}

/// Compute today's streak.
///
/// Returns `None` when the count is unknown; in that case nothing may be
/// written for today.
pub fn next_streak(today: CommitCount, previous: Option<&DailyRecord>) -> Option<u32> {
    let count = today.known()?;
    if count == 0 {
        return Some(0);
    }

    let (prev_count, prev_streak) = previous
        .map(|r| (r.commit_count, r.streak))
        .unwrap_or((0, 0));

    if prev_count > 0 {
        Some(prev_streak.saturating_add(1))
    } else {
        Some(1)
    }
}

/// What the job should do with the store for a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakDecision {
    /// Upsert this row.
    Persist {
        date: NaiveDate,
        commit_count: u32,
        streak: u32,
    },
    /// Leave the store untouched (source failure).
    Skip,
}

impl StreakDecision {
    pub fn streak(&self) -> Option<u32> {
        match self {
            StreakDecision::Persist { streak, .. } => Some(*streak),
            StreakDecision::Skip => None,
        }
    }
}

/// Stateless wrapper that pairs the streak rule with the date being recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreakEngine;

impl StreakEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn advance(
        &self,
        date: NaiveDate,
        today: CommitCount,
        previous: Option<&DailyRecord>,
    ) -> StreakDecision {
        debug_assert!(
            previous.map_or(true, |p| p.date < date),
            "predecessor must precede the recorded day"
        );
        match (today, next_streak(today, previous)) {
            (CommitCount::Known(commit_count), Some(streak)) => StreakDecision::Persist {
                date,
                commit_count,
                streak,
            },
            _ => StreakDecision::Skip,
        }
    }
}
