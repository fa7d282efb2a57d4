//! `SQLite` database connection and operations.
//!
//! The database is stored at `~/.studyfocus/studyfocus.db` and holds the
//! focus interval log.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::config::Paths;
use crate::error::StudyFocusError;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database in the given data directory.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open(paths: &Paths) -> Result<Self, StudyFocusError> {
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &Path) -> Result<Self, StudyFocusError> {
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path).map_err(|e| {
            StudyFocusError::Persistence(format!("Failed to open database {}: {e}", path.display()))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, StudyFocusError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StudyFocusError::Persistence(format!("Failed to open in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Run database migrations.
    fn migrate(&self) -> Result<(), StudyFocusError> {
        migrations::run(&self.conn)
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, StudyFocusError> {
        migrations::get_version(&self.conn)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version().unwrap() > 0);
    }

    #[test]
    fn test_open_in_data_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("home"));

        let db = Database::open(&paths).unwrap();
        assert!(db.schema_version().unwrap() > 0);
        assert!(paths.database.exists());
    }

    #[test]
    fn test_reopen_database() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let db = Database::open_at(&db_path).unwrap();
            assert!(db.schema_version().unwrap() > 0);
        }

        // Reopen - should not run migrations again
        {
            let db = Database::open_at(&db_path).unwrap();
            assert!(db.schema_version().unwrap() > 0);
        }
    }
}
