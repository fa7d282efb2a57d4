//! Output formatting for studyfocus.
//!
//! This module provides formatters for displaying intervals, statistics and
//! configuration in pretty or JSON form.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::StudyFocusError;
use crate::features::focus::{FocusInterval, FocusStats};

pub use json::*;
pub use pretty::*;

/// Format intervals based on output format
///
/// # Errors
///
/// Returns `StudyFocusError::Parse` if JSON serialization fails.
pub fn format_intervals(
    intervals: &[FocusInterval],
    title: &str,
    format: OutputFormat,
) -> Result<String, StudyFocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_intervals_pretty(intervals, title)),
        OutputFormat::Json => format_intervals_json(intervals, title),
    }
}

/// Format statistics based on output format
///
/// # Errors
///
/// Returns `StudyFocusError::Parse` if JSON serialization fails.
pub fn format_stats(stats: &FocusStats, title: &str, format: OutputFormat) -> Result<String, StudyFocusError> {
    match format {
        OutputFormat::Pretty => Ok(stats.format(title)),
        OutputFormat::Json => to_json(stats),
    }
}

/// Format configuration based on output format
///
/// # Errors
///
/// Returns `StudyFocusError::Parse` if JSON serialization fails.
pub fn format_config(config: &Config, paths: &Paths, format: OutputFormat) -> Result<String, StudyFocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_config_pretty(config, paths)),
        OutputFormat::Json => format_config_json(config, paths),
    }
}
