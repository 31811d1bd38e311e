//! # commitstreak Core Library
//!
//! Business logic for the daily commit-streak report. A single invocation
//! asks GitHub how many commits the user made today, records the day in a
//! local SQLite history, derives the consecutive-day streak and posts a
//! summary to Telegram. The CLI crate is a thin shell over [`DailyJob`].
//!
//! ## Architecture
//!
//! - **Streak**: pure rule turning today's count and the previous record
//!   into today's streak
//! - **Storage**: SQLite day-by-day history and TOML/env configuration
//! - **Integrations**: GitHub commit source and Telegram notifier behind
//!   the [`CommitSource`] and [`Notifier`] traits
//! - **Job**: one fetch / compute / persist / notify cycle
//!
//! ## Key Components
//!
//! - [`StreakEngine`]: streak decision rule
//! - [`Database`]: commit history persistence
//! - [`Config`]: job configuration management
//! - [`DailyJob`]: the report itself

pub mod error;
pub mod integrations;
pub mod job;
pub mod message;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, NotifyError, SourceError};
pub use integrations::{CommitSource, GitHubCommitSource, Notifier, TelegramNotifier};
pub use job::{DailyJob, RunReport};
pub use message::Report;
pub use storage::{AggregateStats, Config, DailyRecord, Database};
pub use streak::{next_streak, CommitCount, StreakDecision, StreakEngine};
