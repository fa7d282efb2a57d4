//! History and clear command implementations.

use chrono::{Duration, Local, NaiveDate};
use serde_json::json;

use crate::cli::args::OutputFormat;
use crate::core::parse_history_date;
use crate::error::StudyFocusError;
use crate::features::focus::{local_midnight, ReportPeriod, SessionStore};
use crate::output::{format_intervals, to_json};

/// List stored intervals, optionally bounded by day and count.
///
/// `since` and `until` are inclusive local days.
///
/// # Errors
///
/// Returns an error if a date cannot be parsed or the store cannot be read.
pub fn history(
    store: &dyn SessionStore,
    since: Option<&str>,
    until: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<String, StudyFocusError> {
    let today = Local::now().date_naive();
    let since = since.map(|s| parse_date(s, today)).transpose()?;
    let until = until.map(|s| parse_date(s, today)).transpose()?;

    let (all_start, all_end) = ReportPeriod::AllTime.date_range_from(today);
    let start = since.map_or(all_start, local_midnight);
    let end = until.map_or(all_end, |d| local_midnight(d + Duration::days(1)));

    let mut intervals = if start < end {
        store.query_by_date_range(start, end)?
    } else {
        Vec::new()
    };

    if let Some(limit) = limit {
        let skip = intervals.len().saturating_sub(limit);
        intervals = intervals.split_off(skip);
    }

    let title = match (since, until) {
        (None, None) => "History".to_string(),
        (Some(s), None) => format!("History since {s}"),
        (None, Some(u)) => format!("History until {u}"),
        (Some(s), Some(u)) => format!("History {s} to {u}"),
    };

    format_intervals(&intervals, &title, format)
}

fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, StudyFocusError> {
    parse_history_date(input, today).ok_or_else(|| {
        StudyFocusError::Config(format!(
            "Invalid date: {input}. Use today, yesterday, Nd, or YYYY-MM-DD"
        ))
    })
}

/// Delete every interval in the store's scope.
///
/// # Errors
///
/// Returns an error without `force`, or if the store cannot be written.
pub fn clear(store: &mut dyn SessionStore, force: bool, format: OutputFormat) -> Result<String, StudyFocusError> {
    if !force {
        return Err(StudyFocusError::Config(
            "Refusing to clear history without --force".to_string(),
        ));
    }

    let removed = store.clear()?;

    match format {
        OutputFormat::Json => to_json(&json!({ "cleared": removed })),
        OutputFormat::Pretty => Ok(format!(
            "Cleared {removed} interval{}",
            if removed == 1 { "" } else { "s" }
        )),
    }
}
