//! Focus statistics.
//!
//! Derives aggregate numbers from the interval log. Nothing here is stored;
//! every figure is recomputed from the intervals passed in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::interval::FocusInterval;
use super::timer::format_duration;

/// Weekly focus goal used when none is configured (10 hours).
pub const DEFAULT_WEEKLY_GOAL_MINUTES: u32 = 600;

/// 9999-12-31T23:59:59Z, the last instant with a four-digit year.
const LAST_SECOND_OF_9999: i64 = 253_402_300_799;

/// Time period for history and stats queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// All time
    AllTime,
}

impl ReportPeriod {
    /// Half-open `[start, end)` bounds for this period, relative to `today`.
    ///
    /// Local calendar days are converted to UTC instants.
    #[must_use]
    pub fn date_range_from(&self, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let tomorrow = today + Duration::days(1);
        let (first, after_last) = match *self {
            Self::Today => (today, tomorrow),
            Self::Week => (today - Duration::days(6), tomorrow),
            Self::Month => (today - Duration::days(29), tomorrow),
            Self::AllTime => {
                let end = DateTime::<Utc>::from_timestamp(LAST_SECOND_OF_9999, 0)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                return (DateTime::<Utc>::default(), end);
            }
        };
        (local_midnight(first), local_midnight(after_last))
    }

    /// Half-open bounds relative to the current local date.
    #[must_use]
    pub fn date_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.date_range_from(Local::now().date_naive())
    }

    /// Parse period from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "today" | "t" | "d" => Some(Self::Today),
            "week" | "w" | "7d" => Some(Self::Week),
            "month" | "m" | "30d" => Some(Self::Month),
            "all" | "alltime" | "all-time" => Some(Self::AllTime),
            _ => None,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::AllTime => "All Time",
        }
    }
}

/// Start of a local calendar day as a UTC instant.
///
/// Falls back to UTC midnight when local midnight does not exist (DST gaps).
#[must_use]
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| Utc.from_utc_datetime(&naive), |t| t.with_timezone(&Utc))
}

/// Focus totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Local date
    pub date: NaiveDate,
    /// Work minutes completed
    pub minutes: u64,
    /// Work sessions completed
    pub sessions: u32,
}

/// Aggregate statistics over a set of intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusStats {
    /// Completed work sessions
    pub total_sessions: u32,
    /// Minutes of completed work
    pub total_minutes: u64,
    /// Average work session length in minutes
    pub average_session_minutes: f64,
    /// Longest work session in minutes
    pub longest_session_minutes: u32,
    /// Minutes spent on breaks
    pub total_break_minutes: u64,
    /// The seven days ending today, oldest first
    pub weekly_progress: Vec<DailyProgress>,
    /// Work minutes over the last seven days
    pub weekly_minutes: u64,
    /// Weekly target in minutes
    pub weekly_goal_minutes: u32,
    /// Progress towards the weekly target, 0-100
    pub weekly_goal_percent: f64,
    /// Consecutive days with focus time
    pub streak_days: u32,
}

impl FocusStats {
    /// Compute statistics as of `today`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_intervals(intervals: &[FocusInterval], today: NaiveDate, weekly_goal_minutes: u32) -> Self {
        let mut total_sessions: u32 = 0;
        let mut total_minutes: u64 = 0;
        let mut longest_session_minutes: u32 = 0;
        let mut total_break_minutes: u64 = 0;
        let mut by_day: BTreeMap<NaiveDate, (u64, u32)> = BTreeMap::new();

        for interval in intervals {
            if interval.is_work() {
                total_sessions = total_sessions.saturating_add(1);
                total_minutes += u64::from(interval.duration_minutes);
                longest_session_minutes = longest_session_minutes.max(interval.duration_minutes);

                let entry = by_day.entry(interval.date_local().date_naive()).or_insert((0, 0));
                entry.0 += u64::from(interval.duration_minutes);
                entry.1 = entry.1.saturating_add(1);
            } else {
                total_break_minutes += u64::from(interval.duration_minutes);
            }
        }

        let average_session_minutes = if total_sessions > 0 {
            total_minutes as f64 / f64::from(total_sessions)
        } else {
            0.0
        };

        let weekly_progress: Vec<DailyProgress> = (0..7)
            .rev()
            .map(|days_ago| {
                let date = today - Duration::days(days_ago);
                let (minutes, sessions) = by_day.get(&date).copied().unwrap_or((0, 0));
                DailyProgress {
                    date,
                    minutes,
                    sessions,
                }
            })
            .collect();

        let weekly_minutes: u64 = weekly_progress.iter().map(|d| d.minutes).sum();
        let weekly_goal_percent = if weekly_goal_minutes > 0 {
            (weekly_minutes as f64 / f64::from(weekly_goal_minutes) * 100.0).min(100.0)
        } else {
            0.0
        };

        let days: BTreeSet<NaiveDate> = by_day.keys().copied().collect();

        Self {
            total_sessions,
            total_minutes,
            average_session_minutes,
            longest_session_minutes,
            total_break_minutes,
            weekly_progress,
            weekly_minutes,
            weekly_goal_minutes,
            weekly_goal_percent,
            streak_days: calculate_streak(&days, today),
        }
    }

    /// Format the stats for display.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn format(&self, title: &str) -> String {
        let mut lines = Vec::new();

        lines.push(format!("📊 Focus Stats: {title}"));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  Total focus time:    {}",
            format_duration(Duration::minutes(i64::try_from(self.total_minutes).unwrap_or(i64::MAX)))
        ));
        lines.push(format!("  Completed sessions:  {}", self.total_sessions));
        lines.push(format!(
            "  Average session:     {:.0} minutes",
            self.average_session_minutes
        ));
        lines.push(format!(
            "  Longest session:     {} minutes",
            self.longest_session_minutes
        ));
        lines.push(format!("  Break time:          {} minutes", self.total_break_minutes));
        lines.push(format!("  Current streak:      {} days", self.streak_days));
        lines.push(String::new());

        lines.push("This Week".to_string());
        lines.push("─".repeat(40));
        let max_day = self
            .weekly_progress
            .iter()
            .map(|d| d.minutes)
            .max()
            .unwrap_or(1)
            .max(1);

        for day in &self.weekly_progress {
            let bar_len = (day.minutes as f64 / max_day as f64 * 20.0) as usize;
            lines.push(format!(
                "  {} {:>4}m {}",
                day.date.format("%a %m-%d"),
                day.minutes,
                "█".repeat(bar_len)
            ));
        }
        lines.push(format!(
            "  Goal: {}/{} minutes ({:.0}%)",
            self.weekly_minutes, self.weekly_goal_minutes, self.weekly_goal_percent
        ));

        lines.join("\n")
    }
}

/// Count consecutive focus days backwards from today.
///
/// A day without focus yet does not break the streak; counting starts from
/// yesterday in that case.
fn calculate_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut check_date = today;

    if !days.contains(&today) {
        check_date = today - Duration::days(1);
        if !days.contains(&check_date) {
            return 0;
        }
    }

    let mut streak = 0;
    while days.contains(&check_date) {
        streak += 1;
        check_date -= Duration::days(1);
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::interval::Phase;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    /// An interval at local noon `days_ago` days before `today()`.
    fn interval(kind: Phase, seconds: u32, days_ago: i64) -> FocusInterval {
        let date = (today() - Duration::days(days_ago))
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let local = Local.from_local_datetime(&date).earliest().unwrap();
        FocusInterval::new("s", kind, seconds, local.with_timezone(&Utc))
    }

    #[test]
    fn test_empty_stats_are_zero() {
        let stats = FocusStats::from_intervals(&[], today(), 600);

        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_minutes, 0);
        assert!(stats.average_session_minutes.abs() < f64::EPSILON);
        assert_eq!(stats.longest_session_minutes, 0);
        assert_eq!(stats.weekly_minutes, 0);
        assert!(stats.weekly_goal_percent.abs() < f64::EPSILON);
        assert_eq!(stats.streak_days, 0);
        assert_eq!(stats.weekly_progress.len(), 7);
        assert!(stats.weekly_progress.iter().all(|d| d.minutes == 0));
    }

    #[test]
    fn test_breaks_are_not_sessions() {
        let intervals = vec![
            interval(Phase::Work, 1500, 0),
            interval(Phase::Break, 300, 0),
            interval(Phase::Work, 3000, 0),
        ];
        let stats = FocusStats::from_intervals(&intervals, today(), 600);

        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_minutes, 75);
        assert_eq!(stats.total_break_minutes, 5);
        assert_eq!(stats.longest_session_minutes, 50);
        assert!((stats.average_session_minutes - 37.5).abs() < 0.01);
    }

    #[test]
    fn test_weekly_progress_window() {
        let intervals = vec![
            interval(Phase::Work, 1500, 0),
            interval(Phase::Work, 1500, 6),
            interval(Phase::Work, 1500, 7),
        ];
        let stats = FocusStats::from_intervals(&intervals, today(), 100);

        assert_eq!(stats.weekly_progress.first().unwrap().date, today() - Duration::days(6));
        assert_eq!(stats.weekly_progress.last().unwrap().date, today());
        assert_eq!(stats.weekly_minutes, 50);
        assert!((stats.weekly_goal_percent - 50.0).abs() < 0.01);
        // Older work still counts towards the totals
        assert_eq!(stats.total_minutes, 75);
    }

    #[test]
    fn test_goal_percent_is_capped() {
        let intervals = vec![interval(Phase::Work, 6000, 0)];
        let stats = FocusStats::from_intervals(&intervals, today(), 60);
        assert!((stats.weekly_goal_percent - 100.0).abs() < f64::EPSILON);

        let no_goal = FocusStats::from_intervals(&intervals, today(), 0);
        assert!(no_goal.weekly_goal_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_streak_counts_from_yesterday() {
        let intervals = vec![
            interval(Phase::Work, 1500, 1),
            interval(Phase::Work, 1500, 2),
            interval(Phase::Work, 1500, 4),
        ];
        let stats = FocusStats::from_intervals(&intervals, today(), 600);
        assert_eq!(stats.streak_days, 2);
    }

    #[test]
    fn test_streak_ignores_breaks() {
        let intervals = vec![interval(Phase::Break, 300, 0)];
        let stats = FocusStats::from_intervals(&intervals, today(), 600);
        assert_eq!(stats.streak_days, 0);
    }

    #[test]
    fn test_report_period_parse() {
        assert_eq!(ReportPeriod::parse("today"), Some(ReportPeriod::Today));
        assert_eq!(ReportPeriod::parse("week"), Some(ReportPeriod::Week));
        assert_eq!(ReportPeriod::parse("month"), Some(ReportPeriod::Month));
        assert_eq!(ReportPeriod::parse("all"), Some(ReportPeriod::AllTime));
        assert_eq!(ReportPeriod::parse("fortnight"), None);
    }

    #[test]
    fn test_report_period_bounds() {
        let (start, end) = ReportPeriod::Today.date_range_from(today());
        assert!(start < end);
        assert_eq!(end - start, Duration::days(1));

        let (start, end) = ReportPeriod::Week.date_range_from(today());
        assert_eq!(end - start, Duration::days(7));
    }

    #[test]
    fn test_format_contains_summary() {
        let intervals = vec![interval(Phase::Work, 1500, 0)];
        let stats = FocusStats::from_intervals(&intervals, today(), 600);
        let text = stats.format("All Time");
        assert!(text.contains("Completed sessions:  1"));
        assert!(text.contains("25 minutes"));
    }
}
