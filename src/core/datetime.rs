//! Date parsing for history filters.
//!
//! Accepted forms:
//! - `today`, `yesterday`
//! - `Nd` or `N days ago` (N days before today)
//! - `2024-12-15` (ISO format)

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DAYS_AGO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*(?:d|days?(?:\s+ago)?)$")
        .unwrap_or_else(|e| panic!("Invalid days-ago regex: {e}"))
});

/// Parse a history date relative to `today`.
///
/// Returns `None` if the input cannot be parsed.
#[must_use]
pub fn parse_history_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" => return Some(today),
        "yesterday" => return today.checked_sub_signed(Duration::days(1)),
        _ => {},
    }

    if let Some(caps) = DAYS_AGO.captures(&input) {
        let days: i64 = caps[1].parse().ok()?;
        return today.checked_sub_signed(Duration::try_days(days)?);
    }

    NaiveDate::parse_from_str(&input, "%Y-%m-%d").ok()
}
