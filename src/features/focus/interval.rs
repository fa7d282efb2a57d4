//! Completed focus intervals.
//!
//! A [`FocusInterval`] is the immutable record of one finished phase.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two alternating timer activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Focused work
    Work,
    /// Rest between work phases
    Break,
}

impl Phase {
    /// The phase that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }

    /// Stable storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
        }
    }

    /// Parse a storage name back into a phase.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "work" | "focus" | "w" => Some(Self::Work),
            "break" | "rest" | "b" => Some(Self::Break),
            _ => None,
        }
    }

    /// Check if this is a break phase.
    #[must_use]
    pub const fn is_break(self) -> bool {
        matches!(self, Self::Break)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A completed phase, persisted once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusInterval {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Device or user key the interval belongs to
    pub scope: String,
    /// When the phase completed
    pub date: DateTime<Utc>,
    /// Length of the phase in seconds
    pub duration_seconds: u32,
    /// Length of the phase in whole minutes, rounded up
    pub duration_minutes: u32,
    /// Which phase finished
    #[serde(rename = "type")]
    pub kind: Phase,
}

impl FocusInterval {
    /// Record a phase of `duration_seconds` that completed at `date`.
    #[must_use]
    pub fn new(scope: &str, kind: Phase, duration_seconds: u32, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            scope: scope.to_string(),
            date,
            duration_seconds,
            duration_minutes: minutes_rounded_up(duration_seconds),
            kind,
        }
    }

    /// Record a phase that completed just now.
    #[must_use]
    pub fn completed_now(scope: &str, kind: Phase, duration_seconds: u32) -> Self {
        Self::new(scope, kind, duration_seconds, Utc::now())
    }

    /// Completion time in the local timezone.
    #[must_use]
    pub fn date_local(&self) -> DateTime<Local> {
        self.date.with_timezone(&Local)
    }

    /// Whether this interval counts as focused work.
    #[must_use]
    pub const fn is_work(&self) -> bool {
        matches!(self.kind, Phase::Work)
    }
}

/// Whole minutes covering `seconds`; any positive duration is at least one minute.
#[must_use]
pub const fn minutes_rounded_up(seconds: u32) -> u32 {
    seconds.div_ceil(60)
}
