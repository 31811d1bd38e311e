//! TOML-based job configuration with environment overrides.
//!
//! Settings come from, in increasing priority:
//! - built-in defaults
//! - `~/.config/commitstreak/config.toml` (optional)
//! - environment variables (`GH_USERNAME`, `GH_TOKEN`, `TELEGRAM_TOKEN`,
//!   `TELEGRAM_CHAT_ID`, `COMMITSTREAK_DB`)
//!
//! [`Config::load`] always validates; a config that fails validation never
//! reaches the job.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use super::data_dir;
use crate::error::ConfigError;

pub const ENV_GH_USERNAME: &str = "GH_USERNAME";
pub const ENV_GH_TOKEN: &str = "GH_TOKEN";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_DB_PATH: &str = "COMMITSTREAK_DB";

/// GitHub commit search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default)]
    pub username: String,
    /// Optional token; raises the search API rate limit.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_github_api")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Telegram bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: Option<i64>,
    #[serde(default = "default_telegram_api")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where the history database lives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Defaults to `<data_dir>/commits.db`.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Job configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_github_api() -> String {
    "https://api.github.com".into()
}
fn default_telegram_api() -> String {
    "https://api.telegram.org".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            token: None,
            api_base: default_github_api(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: None,
            api_base: default_telegram_api(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/commitstreak"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the file (if any), apply process environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed,
    /// or if the merged result fails [`Config::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Self::resolve()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// File plus environment, without validation.
    ///
    /// For commands that only touch the history (`stats`, `history`) and
    /// must work without chat credentials.
    pub fn resolve() -> Result<Self, ConfigError> {
        let mut cfg = Self::from_file(&Self::path()?)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Read `path` as TOML; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| ConfigError::ParseFailed(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Overlay values from `lookup` (normally the process environment).
    ///
    /// Empty variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(username) = get(ENV_GH_USERNAME) {
            self.github.username = username;
        }
        if let Some(token) = get(ENV_GH_TOKEN) {
            self.github.token = Some(token);
        }
        if let Some(token) = get(ENV_TELEGRAM_TOKEN) {
            self.telegram.bot_token = token;
        }
        if let Some(raw) = get(ENV_TELEGRAM_CHAT_ID) {
            let chat_id = raw.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TELEGRAM_CHAT_ID.into(),
                message: format!("must be an integer, got '{raw}'"),
            })?;
            self.telegram.chat_id = Some(chat_id);
        }
        if let Some(path) = get(ENV_DB_PATH) {
            self.storage.db_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Check that everything the job needs is present and well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github.username.trim().is_empty() {
            return Err(ConfigError::MissingKey("github.username".into()));
        }
        // Pasted verbatim into the search `q`.
        if !self
            .github
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::InvalidValue {
                key: "github.username".into(),
                message: "must contain only letters, digits and '-'".into(),
            });
        }
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingKey("telegram.bot_token".into()));
        }
        if self.telegram.chat_id.is_none() {
            return Err(ConfigError::MissingKey("telegram.chat_id".into()));
        }
        validate_url("github.api_base", &self.github.api_base)?;
        validate_url("telegram.api_base", &self.telegram.api_base)?;
        for (key, secs) in [
            ("github.timeout_secs", self.github.timeout_secs),
            ("telegram.timeout_secs", self.telegram.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "must be greater than 0".into(),
                });
            }
        }
        Ok(())
    }

    /// Database path, falling back to `<data_dir>/commits.db`.
    pub fn db_path(&self) -> std::io::Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("commits.db")),
        }
    }

    /// Copy safe to print: secrets are masked.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if let Some(token) = cfg.github.token.as_mut() {
            *token = mask(token);
        }
        cfg.telegram.bot_token = mask(&cfg.telegram.bot_token);
        cfg
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        key: key.into(),
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".into()
    }
}
