//! Database migrations for studyfocus.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;
use tracing::info;

use crate::error::StudyFocusError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, StudyFocusError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StudyFocusError::Persistence(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), StudyFocusError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| StudyFocusError::Persistence(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), StudyFocusError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        info!(version, "running database migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), StudyFocusError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(StudyFocusError::Persistence(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// `seq` keeps insertion order; `id` is unique so duplicate appends are
/// ignored.
fn migrate_v1(conn: &Connection) -> Result<(), StudyFocusError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS focus_intervals (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            scope TEXT NOT NULL,
            date TEXT NOT NULL,
            duration_seconds INTEGER NOT NULL CHECK (duration_seconds > 0),
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            kind TEXT NOT NULL CHECK (kind IN ('work', 'break'))
        );

        CREATE INDEX IF NOT EXISTS idx_focus_intervals_scope_date
        ON focus_intervals(scope, date);
        ",
    )
    .map_err(|e| StudyFocusError::Persistence(format!("Migration v1 failed: {e}")))
}
