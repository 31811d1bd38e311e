//! Core error types for commitstreak-core.
//!
//! Each external collaborator (commit source, streak store, notifier,
//! configuration) has its own error enum; [`CoreError`] gathers them for
//! callers that only need to report a failure.

use std::path::PathBuf;
use thiserror::Error;

/// Anything that can abort a run.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("streak store: {0}")]
    Database(#[from] DatabaseError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Only surfaces from client construction; a failed fetch inside a run
    /// becomes an unknown count instead.
    #[error("commit source: {0}")]
    Source(#[from] SourceError),

    #[error("notification: {0}")]
    Notify(#[from] NotifyError),
}

/// Streak store failures.
///
/// A lookup that finds nothing is not an error; it is reported as `Ok(None)`.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("cannot open commit history at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("history query failed: {0}")]
    QueryFailed(String),

    #[error("history schema upgrade failed: {0}")]
    MigrationFailed(String),

    /// Another process holds the SQLite lock (`SQLITE_BUSY` / `SQLITE_LOCKED`).
    #[error("commit history is locked by another process")]
    Locked,

    /// A stored date, timestamp or count could not be decoded.
    #[error("corrupt history row: {0}")]
    CorruptRow(String),
}

/// Configuration problems, detected before any network or storage access.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("missing required setting {0}")]
    MissingKey(String),

    #[error("malformed config file {0}")]
    ParseFailed(String),
}

/// The commit source could not produce a count.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Request could not be built or sent, or timed out
    #[error("GitHub request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("GitHub API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("unexpected GitHub response: {0}")]
    Decode(String),
}

/// The notifier could not deliver a message.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Request could not be built or sent, or timed out
    #[error("Telegram request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("Telegram API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP succeeded but the API answered `ok: false`
    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::InvalidColumnType(..) => DatabaseError::CorruptRow(err.to_string()),
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Shorthand for results carrying [`CoreError`].
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
