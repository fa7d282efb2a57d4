//! Statistics command implementation.

use chrono::Local;

use crate::cli::args::OutputFormat;
use crate::error::StudyFocusError;
use crate::features::focus::{FocusStats, ReportPeriod, SessionStore};
use crate::output::format_stats;

/// Show aggregate focus statistics for the intervals recorded in `period`.
///
/// # Errors
///
/// Returns an error if the period is unknown, the store cannot be read, or
/// output formatting fails.
pub fn stats(
    store: &dyn SessionStore,
    period: &str,
    weekly_goal_minutes: u32,
    format: OutputFormat,
) -> Result<String, StudyFocusError> {
    let report_period = ReportPeriod::parse(period).ok_or_else(|| {
        StudyFocusError::Config(format!("Invalid period '{period}'. Use today, week, month, or all"))
    })?;

    let (start, end) = report_period.date_range();
    let intervals = store.query_by_date_range(start, end)?;
    let stats = FocusStats::from_intervals(&intervals, Local::now().date_naive(), weekly_goal_minutes);
    format_stats(&stats, report_period.display_name(), format)
}
