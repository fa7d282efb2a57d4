use colored::Colorize;

use crate::config::{Config, Paths};
use crate::features::focus::{format_duration, FocusInterval, Phase};

/// Format a list of intervals as a pretty table
pub fn format_intervals_pretty(intervals: &[FocusInterval], title: &str) -> String {
    if intervals.is_empty() {
        return format!("{title} (0 intervals)\n  No intervals recorded");
    }

    let mut output = format!("{} ({} intervals)\n", title, intervals.len());
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for interval in intervals {
        let kind = match interval.kind {
            Phase::Work => format!("{:<6}", interval.kind.as_str()).red(),
            Phase::Break => format!("{:<6}", interval.kind.as_str()).green(),
        };

        output.push_str(&format!(
            "{}  {} {:>4} min  {}\n",
            interval.date_local().format("%Y-%m-%d %H:%M").to_string().dimmed(),
            kind,
            interval.duration_minutes,
            format_duration(chrono::Duration::seconds(i64::from(interval.duration_seconds))).dimmed()
        ));
    }

    output
}

/// Format the effective configuration
pub fn format_config_pretty(config: &Config, paths: &Paths) -> String {
    let minutes = |seconds: u32| format_duration(chrono::Duration::seconds(i64::from(seconds)));
    let on_off = |flag: bool| if flag { "on".green() } else { "off".dimmed() };

    let mut output = format!("{}\n", "Configuration".bold());
    output.push_str(&format!("  {}: {}\n", "File".dimmed(), paths.config_file.display()));
    output.push_str(&format!("  {}: {}\n", "Work".dimmed(), minutes(config.timer.work_seconds)));
    output.push_str(&format!("  {}: {}\n", "Break".dimmed(), minutes(config.timer.break_seconds)));
    output.push_str(&format!(
        "  {}: {}\n",
        "Auto-continue".dimmed(),
        on_off(config.timer.auto_continue)
    ));
    output.push_str(&format!(
        "  {}: {} (bell {}, desktop {})\n",
        "Notifications".dimmed(),
        on_off(config.notifications.enabled),
        on_off(config.notifications.bell),
        on_off(config.notifications.desktop)
    ));
    output.push_str(&format!(
        "  {}: {} (scope {})\n",
        "Store".dimmed(),
        config.storage.backend,
        config.storage.scope
    ));
    output.push_str(&format!(
        "  {}: {} minutes",
        "Weekly goal".dimmed(),
        config.stats.weekly_goal_minutes
    ));

    output
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_empty_intervals() {
        colored::control::set_override(false);
        let output = format_intervals_pretty(&[], "History");
        assert!(output.contains("0 intervals"));
    }

    #[test]
    fn test_intervals_table() {
        colored::control::set_override(false);
        let date = Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap();
        let intervals = vec![
            FocusInterval::new("desk", Phase::Work, 1500, date),
            FocusInterval::new("desk", Phase::Break, 300, date),
        ];

        let output = format_intervals_pretty(&intervals, "History");
        assert!(output.starts_with("History (2 intervals)"));
        assert!(output.contains("work"));
        assert!(output.contains("25 min"));
        assert!(output.contains("5 minutes"));
    }

    #[test]
    fn test_config_pretty() {
        colored::control::set_override(false);
        let output = format_config_pretty(&Config::default(), &Paths::with_root("/tmp/sf".into()));
        assert!(output.contains("25 minutes"));
        assert!(output.contains("sqlite"));
        assert!(output.contains("600 minutes"));
    }
}
