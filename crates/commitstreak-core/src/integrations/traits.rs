use chrono::NaiveDate;

use crate::error::{NotifyError, SourceError};

/// Answers "how many commits did the configured user make on `date`?".
///
/// Any failure is an error; implementations never fall back to 0.
#[allow(async_fn_in_trait)]
pub trait CommitSource {
    /// Unique identifier (e.g. "github").
    fn name(&self) -> &str;

    async fn commit_count(&self, date: NaiveDate) -> Result<u32, SourceError>;
}

/// Delivers an already-rendered summary to a chat destination.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Unique identifier (e.g. "telegram").
    fn name(&self) -> &str;

    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
