pub mod config;
pub mod history;
pub mod run;
pub mod stats;

use commitstreak_core::{Config, Database};

/// Open the history database named by `config`, creating its directory.
pub fn open_database(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    let path = config.db_path()?;
    tracing::debug!(path = %path.display(), "opening history database");
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Database::open(&path)?)
}
