//! Focus timer and session tracking.
//!
//! Provides Pomodoro-style work/break cycles with persisted history:
//! - [`TimerEngine`] state machine driven by one-second ticks
//! - [`SessionStore`] backends (memory, JSON file, `SQLite`)
//! - Statistics derived from the interval log
//! - Phase-completion notifiers

pub mod engine;
pub mod interval;
pub mod json_store;
pub mod notifier;
pub mod sqlite_store;
pub mod stats;
pub mod store;
pub mod ticker;
pub mod timer;

pub use engine::{TimerEngine, TimerEvent, DEFAULT_SCOPE};
pub use interval::{minutes_rounded_up, FocusInterval, Phase};
pub use json_store::JsonFileStore;
pub use notifier::{CompositeNotifier, DesktopNotifier, Notifier, TerminalBell};
pub use sqlite_store::SqliteStore;
pub use stats::{local_midnight, DailyProgress, FocusStats, ReportPeriod, DEFAULT_WEEKLY_GOAL_MINUTES};
pub use store::{MemoryStore, SessionStore};
pub use ticker::TickSource;
pub use timer::{
    format_duration, format_duration_mmss, parse_duration, parse_phase_seconds,
    render_progress_bar, RunStatus, TimerConfig, TimerState,
};
