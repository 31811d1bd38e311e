pub mod github;
pub mod telegram;
pub mod traits;

pub use github::GitHubCommitSource;
pub use telegram::TelegramNotifier;
pub use traits::{CommitSource, Notifier};
