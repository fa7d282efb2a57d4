//! Path resolution for studyfocus configuration and data files.
//!
//! All studyfocus data is stored in `~/.studyfocus/` unless
//! `STUDYFOCUS_HOME` points somewhere else:
//! - `config.yaml` - Main configuration file
//! - `studyfocus.db` - `SQLite` database of completed intervals
//! - `sessions.json` - Interval log for the JSON backend
//! - `studyfocus.log` - Log file written while the TUI owns the terminal

use std::path::PathBuf;

use crate::error::StudyFocusError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "STUDYFOCUS_HOME";

/// Paths to studyfocus configuration and data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root directory: `~/.studyfocus/`
    pub root: PathBuf,
    /// Config file: `~/.studyfocus/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.studyfocus/studyfocus.db`
    pub database: PathBuf,
    /// JSON interval log: `~/.studyfocus/sessions.json`
    pub sessions_json: PathBuf,
    /// Log file: `~/.studyfocus/studyfocus.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolve paths from `STUDYFOCUS_HOME`, falling back to `~/.studyfocus`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, StudyFocusError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            StudyFocusError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".studyfocus")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("studyfocus.db"),
            sessions_json: root.join("sessions.json"),
            log_file: root.join("studyfocus.log"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), StudyFocusError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                StudyFocusError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".studyfocus")))
    }
}
