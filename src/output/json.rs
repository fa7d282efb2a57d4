//! JSON output formatting for studyfocus.

use serde::Serialize;
use serde_json::json;

use crate::config::{Config, Paths};
use crate::error::StudyFocusError;
use crate::features::focus::FocusInterval;

/// Format intervals as JSON
///
/// # Errors
///
/// Returns `StudyFocusError::Parse` if JSON serialization fails.
pub fn format_intervals_json(intervals: &[FocusInterval], title: &str) -> Result<String, StudyFocusError> {
    let output = json!({
        "title": title,
        "count": intervals.len(),
        "items": intervals
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the effective configuration as JSON
///
/// # Errors
///
/// Returns `StudyFocusError::Parse` if JSON serialization fails.
pub fn format_config_json(config: &Config, paths: &Paths) -> Result<String, StudyFocusError> {
    let output = json!({
        "path": paths.config_file,
        "config": config
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `StudyFocusError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, StudyFocusError> {
    Ok(serde_json::to_string_pretty(value)?)
}
