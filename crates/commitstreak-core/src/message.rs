//! Chat message rendering for the daily summary.

use serde::{Deserialize, Serialize};

use crate::storage::AggregateStats;
use crate::streak::CommitCount;

/// Everything the summary message needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub commits: CommitCount,
    /// Today's streak (or, when the count is unknown, the last stored one).
    pub streak: u32,
    /// Streak of the predecessor day; shown when today breaks it.
    pub previous_streak: u32,
    pub stats: Option<AggregateStats>,
}

fn days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

/// Render `report` as the text sent to chat.
pub fn render(report: &Report) -> String {
    let mut text = match report.commits {
        CommitCount::Unknown => {
            "❌ Couldn't check today's commits. The GitHub API is temporarily unavailable."
                .to_string()
        }
        CommitCount::Known(0) => {
            let mut t = "😴 No commits yet today! The streak is broken.".to_string();
            if report.previous_streak > 0 {
                t.push_str(&format!(
                    "\n🔥 It was {} in a row!",
                    days(report.previous_streak)
                ));
            }
            t
        }
        CommitCount::Known(1) => {
            let mut t = "👍 1 commit today!".to_string();
            if report.streak > 0 {
                t.push_str(&format!(" 🔥 Current streak: {}", days(report.streak)));
            }
            t
        }
        CommitCount::Known(n) => {
            let mut t = format!("🚀 {n} commits today!");
            if report.streak > 0 {
                t.push_str(&format!(" 🔥 Streak: {}", days(report.streak)));
            }
            t
        }
    };

    if let Some(stats) = &report.stats {
        text.push_str(&format!(
            "\n\n📊 Stats:\n📝 Total commits: {}\n🔥 Current streak: {}\n🏆 Record: {}",
            stats.total_commits,
            days(stats.current_streak),
            days(stats.max_streak),
        ));
    }

    text
}
