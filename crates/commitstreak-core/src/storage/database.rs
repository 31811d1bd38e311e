//! SQLite-based daily commit history.
//!
//! Provides persistent storage for:
//! - One [`DailyRecord`] per calendar day (upserted by date)
//! - Point and "most recent" lookups used to find the streak predecessor
//! - All-time aggregates ([`AggregateStats`]) for the summary message

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::migrations;
use crate::error::DatabaseError;

/// Storage format for the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const RECORD_COLUMNS: &str = "date, count, streak, created_at";

/// Commit count and streak for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub commit_count: u32,
    pub streak: u32,
    pub created_at: DateTime<Utc>,
}

/// Summary over the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AggregateStats {
    pub total_commits: u64,
    /// Streak of the most recent record (0 when empty).
    pub current_streak: u32,
    pub max_streak: u32,
}

/// SQLite database holding the commit history.
///
/// The connection is released when the value is dropped; [`Database::close`]
/// does the same but reports errors.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// File backing this database, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Open (or create) the database file at `path` and apply migrations.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self {
            conn,
            path: Some(path),
        };
        db.migrate()?;
        tracing::debug!(path = ?db.path, "database opened");
        Ok(db)
    }

    /// Open an in-memory database. Contents vanish on drop.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn, path: None };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        migrations::migrate(&self.conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Close the connection, surfacing any error SQLite reports.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.conn.close().map_err(|(_conn, e)| e.into())
    }

    /// Insert or overwrite the record for `date`.
    ///
    /// Re-running for the same date replaces `count` and `streak` but keeps
    /// the first `created_at`.
    ///
    /// # Errors
    /// Returns an error if the statement fails.
    pub fn upsert(&self, date: NaiveDate, count: u32, streak: u32) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO commits (date, count, streak, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(date) DO UPDATE SET
                count = excluded.count,
                streak = excluded.streak",
            params![
                date.format(DATE_FORMAT).to_string(),
                count,
                streak,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Latest record by date, `None` on an empty store.
    pub fn most_recent_record(&self) -> Result<Option<DailyRecord>, DatabaseError> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM commits ORDER BY date DESC LIMIT 1"),
                [],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Latest record strictly before `date`.
    ///
    /// This is the streak predecessor: a rerun for `date` never sees its own
    /// earlier write.
    pub fn latest_record_before(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, DatabaseError> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM commits
                     WHERE date < ?1
                     ORDER BY date DESC LIMIT 1"
                ),
                params![date.format(DATE_FORMAT).to_string()],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Point lookup. A missing day is `Ok(None)`.
    pub fn record_for_date(&self, date: NaiveDate) -> Result<Option<DailyRecord>, DatabaseError> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM commits WHERE date = ?1"),
                params![date.format(DATE_FORMAT).to_string()],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Records newest first. `limit = None` returns everything.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<DailyRecord>, DatabaseError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM commits ORDER BY date DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Total commits, current streak and best streak over all records.
    pub fn aggregate_stats(&self) -> Result<AggregateStats, DatabaseError> {
        let (total_commits, max_streak) = self.conn.query_row(
            "SELECT COALESCE(SUM(count), 0), COALESCE(MAX(streak), 0) FROM commits",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, u32>(1)?)),
        )?;
        let total_commits = u64::try_from(total_commits)
            .map_err(|_| DatabaseError::CorruptRow(format!("negative commit total {total_commits}")))?;

        let current_streak = self.most_recent_record()?.map_or(0, |r| r.streak);

        Ok(AggregateStats {
            total_commits,
            current_streak,
            max_streak,
        })
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<DailyRecord> {
    let date: String = row.get(0)?;
    let created_at: String = row.get(3)?;

    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(DailyRecord {
        date,
        commit_count: row.get(1)?,
        streak: row.get(2)?,
        created_at,
    })
}
