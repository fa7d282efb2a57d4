//! Storage layer for studyfocus.
//!
//! This module provides the `SQLite` connection and schema migrations, and
//! opens whichever session store backend the configuration selects.

mod database;
mod migrations;

pub use database::Database;

use tracing::info;

use crate::config::{Paths, StoreBackend};
use crate::error::StudyFocusError;
use crate::features::focus::{JsonFileStore, MemoryStore, SessionStore, SqliteStore};

/// Open the session store for `backend` under `paths`.
///
/// # Errors
///
/// Returns an error if the backing file or database cannot be opened.
pub fn open_store(
    backend: StoreBackend,
    paths: &Paths,
    scope: &str,
) -> Result<Box<dyn SessionStore>, StudyFocusError> {
    info!(%backend, scope, "opening session store");
    let store: Box<dyn SessionStore> = match backend {
        StoreBackend::Sqlite => Box::new(SqliteStore::new(Database::open(paths)?, scope)),
        StoreBackend::Json => {
            paths.ensure_dirs()?;
            Box::new(JsonFileStore::open(&paths.sessions_json, scope)?)
        }
        StoreBackend::Memory => Box::new(MemoryStore::new()),
    };
    Ok(store)
}
