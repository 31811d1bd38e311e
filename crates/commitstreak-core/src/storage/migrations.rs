//! Versioned schema for the commit history.
//!
//! [`migrate`] runs on every open and only applies steps newer than the
//! version stored in `schema_version`.

use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};

/// Schema version written by the newest migration step.
pub const SCHEMA_VERSION: i32 = 1;

/// Bring `conn` up to [`SCHEMA_VERSION`].
///
/// # Errors
/// Fails if any migration statement fails; a failed step leaves the
/// previous version in place.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);")?;

    if get_schema_version(conn)? < 1 {
        migrate_v1(conn)?;
    }
    Ok(())
}

/// Stored schema version, or 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> SqliteResult<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: daily commit history.
///
/// One row per calendar day. `date` is `YYYY-MM-DD`, `created_at` is RFC 3339.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS commits (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            date       TEXT NOT NULL UNIQUE,
            count      INTEGER NOT NULL DEFAULT 0,
            streak     INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_commits_date ON commits(date);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}
