//! Timer configuration, snapshots, and duration helpers.
//!
//! Provides the validated [`TimerConfig`], the read-only [`TimerState`]
//! snapshot, and duration parsing/formatting.

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::interval::Phase;
use crate::error::StudyFocusError;

/// Default work phase length (25 minutes).
pub const DEFAULT_WORK_SECONDS: u32 = 25 * 60;

/// Default break phase length (5 minutes).
pub const DEFAULT_BREAK_SECONDS: u32 = 5 * 60;

/// Validated phase durations.
///
/// Can only be built through [`TimerConfig::new`], so every value in
/// circulation has positive durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerConfig {
    work_duration_seconds: u32,
    break_duration_seconds: u32,
    auto_continue: bool,
}

impl TimerConfig {
    /// Create a config, rejecting zero durations.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Config` if either duration is zero.
    pub fn new(work_seconds: u32, break_seconds: u32) -> Result<Self, StudyFocusError> {
        if work_seconds == 0 {
            return Err(StudyFocusError::Config(
                "work duration must be positive".to_string(),
            ));
        }
        if break_seconds == 0 {
            return Err(StudyFocusError::Config(
                "break duration must be positive".to_string(),
            ));
        }
        Ok(Self {
            work_duration_seconds: work_seconds,
            break_duration_seconds: break_seconds,
            auto_continue: true,
        })
    }

    /// Validate raw, possibly negative, durations from an untyped source.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Config` if either value is not a positive
    /// number of seconds that fits in a `u32`.
    pub fn from_raw(work_seconds: i64, break_seconds: i64) -> Result<Self, StudyFocusError> {
        let work = u32::try_from(work_seconds).map_err(|_| {
            StudyFocusError::Config(format!("invalid work duration: {work_seconds}s"))
        })?;
        let brk = u32::try_from(break_seconds).map_err(|_| {
            StudyFocusError::Config(format!("invalid break duration: {break_seconds}s"))
        })?;
        Self::new(work, brk)
    }

    /// Set whether the engine keeps running across a phase flip.
    #[must_use]
    pub const fn with_auto_continue(mut self, auto_continue: bool) -> Self {
        self.auto_continue = auto_continue;
        self
    }

    /// Work phase length in seconds.
    #[must_use]
    pub const fn work_duration_seconds(&self) -> u32 {
        self.work_duration_seconds
    }

    /// Break phase length in seconds.
    #[must_use]
    pub const fn break_duration_seconds(&self) -> u32 {
        self.break_duration_seconds
    }

    /// Whether the engine auto-advances into the next phase.
    #[must_use]
    pub const fn auto_continue(&self) -> bool {
        self.auto_continue
    }

    /// Configured length of `phase` in seconds.
    #[must_use]
    pub const fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration_seconds,
            Phase::Break => self.break_duration_seconds,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_duration_seconds: DEFAULT_WORK_SECONDS,
            break_duration_seconds: DEFAULT_BREAK_SECONDS,
            auto_continue: true,
        }
    }
}

/// Whether the countdown is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Reset to the start of a work phase, not counting
    Idle,
    /// Counting down
    Running,
    /// Stopped mid-phase, keeps the remaining time
    Paused,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// Read-only copy of the engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current activity
    pub phase: Phase,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Whether the countdown is advancing
    pub is_active: bool,
    /// Completed work phases
    pub sessions_completed: u32,
    /// Seconds of completed work
    pub total_focus_seconds: u64,
    /// Idle, running, or paused
    pub status: RunStatus,
    /// Length the current phase started with
    pub phase_length_seconds: u32,
}

impl TimerState {
    /// Remaining time as a Duration.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        Duration::seconds(i64::from(self.remaining_seconds))
    }

    /// Get progress through the current phase as a fraction (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.phase_length_seconds == 0 {
            return 1.0;
        }
        let remaining = f64::from(self.remaining_seconds.min(self.phase_length_seconds));
        1.0 - remaining / f64::from(self.phase_length_seconds)
    }

    /// Format remaining time as MM:SS.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_duration_mmss(self.remaining())
    }

    /// Total focus time as a Duration.
    #[must_use]
    pub fn total_focus(&self) -> Duration {
        Duration::seconds(i64::try_from(self.total_focus_seconds).unwrap_or(i64::MAX))
    }
}

/// Format a duration as MM:SS.
#[must_use]
pub fn format_duration_mmss(d: Duration) -> String {
    let total_seconds = d.num_seconds().abs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

static DURATION_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*([hms]?)").unwrap_or_else(|e| panic!("Invalid duration regex: {e}"))
});

static DURATION_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+\s*[hms]?\s*)+$").unwrap_or_else(|e| panic!("Invalid duration regex: {e}"))
});

/// Parse a duration string like "25m", "1h30m", "90s".
///
/// A bare number, or a trailing number without a unit, means minutes.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();
    if !DURATION_SHAPE.is_match(&s) {
        return None;
    }

    let mut total_seconds: i64 = 0;
    for caps in DURATION_PART.captures_iter(&s) {
        let num: i64 = caps[1].parse().ok()?;
        let factor = match &caps[2] {
            "h" => 3600,
            "s" => 1,
            _ => 60,
        };
        total_seconds = total_seconds.checked_add(num.checked_mul(factor)?)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}

/// Parse a duration string into whole seconds for a timer phase.
///
/// # Errors
///
/// Returns `StudyFocusError::Config` if the string is not a positive duration
/// that fits in a `u32`.
pub fn parse_phase_seconds(s: &str) -> Result<u32, StudyFocusError> {
    parse_duration(s)
        .and_then(|d| u32::try_from(d.num_seconds()).ok())
        .ok_or_else(|| StudyFocusError::Config(format!("Invalid duration: {s}")))
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
