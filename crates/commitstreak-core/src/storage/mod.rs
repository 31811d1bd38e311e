mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, GitHubConfig, StorageConfig, TelegramConfig};
pub use database::{AggregateStats, DailyRecord, Database};

use std::path::PathBuf;

/// Set to `dev` to keep development runs out of the real history.
pub const ENV_PROFILE: &str = "COMMITSTREAK_ENV";

/// Directory holding `config.toml` and the default `commits.db`, created on
/// first use: `~/.config/commitstreak`, or `~/.config/commitstreak-dev` when
/// `COMMITSTREAK_ENV=dev`.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let name = match std::env::var(ENV_PROFILE).as_deref() {
        Ok("dev") => "commitstreak-dev",
        _ => "commitstreak",
    };
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(name);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
