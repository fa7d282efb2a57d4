//! Error types for studyfocus.

use thiserror::Error;

/// Errors that can occur in studyfocus.
#[derive(Debug, Error)]
pub enum StudyFocusError {
    /// Invalid configuration or settings value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A session store read or write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A completion notification could not be delivered.
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Filesystem or terminal I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// YAML (de)serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StudyFocusError {
    /// Whether this error is a configuration problem the user can fix.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<rusqlite::Error> for StudyFocusError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
