//! `SQLite` session store.
//!
//! Persists focus intervals to the local database.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use tracing::debug;

use super::interval::{FocusInterval, Phase};
use super::store::SessionStore;
use crate::error::StudyFocusError;
use crate::storage::Database;

const SELECT_COLUMNS: &str =
    "SELECT id, scope, date, duration_seconds, duration_minutes, kind FROM focus_intervals";

/// Session store backed by the `SQLite` database.
pub struct SqliteStore {
    db: Database,
    scope: String,
}

impl SqliteStore {
    /// Create a store over `db` for intervals of `scope`.
    #[must_use]
    pub fn new(db: Database, scope: &str) -> Self {
        Self {
            db,
            scope: scope.to_string(),
        }
    }

    fn query(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<FocusInterval>, StudyFocusError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StudyFocusError::Persistence(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(args, row_to_interval)
            .map_err(|e| StudyFocusError::Persistence(format!("Failed to query intervals: {e}")))?;

        let mut intervals = Vec::new();
        for row in rows {
            intervals.push(row.map_err(|e| StudyFocusError::Persistence(e.to_string()))?);
        }

        Ok(intervals)
    }
}

impl SessionStore for SqliteStore {
    fn append(&mut self, interval: &FocusInterval) -> Result<(), StudyFocusError> {
        let inserted = self
            .db
            .connection()
            .execute(
                r"INSERT OR IGNORE INTO focus_intervals
                  (id, scope, date, duration_seconds, duration_minutes, kind)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    interval.id,
                    self.scope,
                    format_date(interval.date),
                    interval.duration_seconds,
                    interval.duration_minutes,
                    interval.kind.as_str(),
                ],
            )
            .map_err(|e| StudyFocusError::Persistence(format!("Failed to insert interval: {e}")))?;

        if inserted == 0 {
            debug!(id = %interval.id, "interval already stored");
        }
        Ok(())
    }

    fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusInterval>, StudyFocusError> {
        self.query(
            &format!("{SELECT_COLUMNS} WHERE scope = ?1 AND date >= ?2 AND date < ?3 ORDER BY seq"),
            &[&self.scope, &format_date(start), &format_date(end)],
        )
    }

    fn all(&self) -> Result<Vec<FocusInterval>, StudyFocusError> {
        self.query(
            &format!("{SELECT_COLUMNS} WHERE scope = ?1 ORDER BY seq"),
            &[&self.scope],
        )
    }

    fn clear(&mut self) -> Result<usize, StudyFocusError> {
        self.db
            .connection()
            .execute("DELETE FROM focus_intervals WHERE scope = ?1", [&self.scope])
            .map_err(|e| StudyFocusError::Persistence(format!("Failed to delete intervals: {e}")))
    }
}

/// Fixed-width UTC timestamps so text comparison matches time order.
fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Convert a database row to a `FocusInterval`.
fn row_to_interval(row: &Row<'_>) -> Result<FocusInterval, rusqlite::Error> {
    let date_str: String = row.get(2)?;
    let kind_str: String = row.get(5)?;

    let date = DateTime::parse_from_rfc3339(&date_str)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

    let kind = Phase::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown interval kind: {kind_str}").into(),
        )
    })?;

    Ok(FocusInterval {
        id: row.get(0)?,
        scope: row.get(1)?,
        date,
        duration_seconds: row.get(3)?,
        duration_minutes: row.get(4)?,
        kind,
    })
}
