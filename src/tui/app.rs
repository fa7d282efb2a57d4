//! Application state for the TUI.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver};

use tracing::{debug, warn};

use crate::features::focus::{
    FocusInterval, FocusStats, Phase, RunStatus, TickSource, TimerEngine, TimerEvent, TimerState,
};

/// How many completed intervals the session log keeps.
const RECENT_LIMIT: usize = 5;

/// Step used by the duration adjustment keys.
pub const ADJUST_STEP_SECONDS: i64 = 60;

/// Application state.
pub struct App {
    engine: TimerEngine,
    /// Events forwarded from the engine listener.
    events: Receiver<TimerEvent>,
    /// Held only while the engine is running.
    ticker: Option<TickSource>,
    weekly_goal_minutes: u32,
    /// Stop after this many completed work phases.
    cycles: Option<u32>,
    /// Aggregate stats, refreshed after every completed phase.
    pub stats: Option<FocusStats>,
    /// Intervals completed during this run, newest first.
    pub recent: VecDeque<FocusInterval>,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create a new app around `engine`.
    #[must_use]
    pub fn new(mut engine: TimerEngine, weekly_goal_minutes: u32, cycles: Option<u32>) -> Self {
        let (tx, rx) = mpsc::channel();
        engine.subscribe(move |event| {
            if !matches!(event, TimerEvent::Tick { .. }) {
                // Receiver lives as long as the app
                let _ = tx.send(event.clone());
            }
        });

        let mut app = Self {
            engine,
            events: rx,
            ticker: None,
            weekly_goal_minutes,
            cycles,
            stats: None,
            recent: VecDeque::with_capacity(RECENT_LIMIT),
            status: Some("Press space to start, ? for help".to_string()),
            should_quit: false,
        };
        app.refresh_stats();
        app
    }

    /// Current engine snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TimerState {
        self.engine.snapshot()
    }

    /// Configured work and break lengths in seconds.
    #[must_use]
    pub const fn durations(&self) -> (u32, u32) {
        let config = self.engine.config();
        (config.work_duration_seconds(), config.break_duration_seconds())
    }

    /// Whether the tick source is currently held.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start when idle or paused, pause when running.
    pub fn toggle(&mut self) {
        if self.engine.is_running() {
            self.engine.pause();
            self.status = Some("Paused".to_string());
        } else {
            self.engine.start();
            self.status = None;
        }
        self.sync_ticker();
    }

    /// Reset to an idle work phase.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.status = Some("Reset".to_string());
        self.sync_ticker();
    }

    /// Change the work length by `delta` seconds.
    pub fn adjust_work(&mut self, delta: i64) {
        let (work, brk) = self.durations();
        self.apply(i64::from(work) + delta, i64::from(brk));
    }

    /// Change the break length by `delta` seconds.
    pub fn adjust_break(&mut self, delta: i64) {
        let (work, brk) = self.durations();
        self.apply(i64::from(work), i64::from(brk) + delta);
    }

    fn apply(&mut self, work: i64, brk: i64) {
        if self.engine.apply_raw_settings(work, brk).is_ok() {
            let (work, brk) = self.durations();
            self.status = Some(format!(
                "Work {}m, break {}m{}",
                work / 60,
                brk / 60,
                if self.snapshot().status == RunStatus::Idle {
                    ""
                } else {
                    " (from next phase)"
                }
            ));
        }
        self.drain_events();
    }

    /// Apply every tick that arrived since the last call.
    pub fn process_ticks(&mut self) {
        let pending = self.ticker.as_ref().map_or(0, TickSource::pending);
        self.advance(pending);
    }

    /// Advance the engine by up to `ticks` seconds and handle the results.
    ///
    /// Stops early once the cycle target is reached.
    pub fn advance(&mut self, ticks: usize) {
        for _ in 0..ticks {
            if self.should_quit {
                break;
            }
            self.engine.tick();
            self.drain_events();
        }
        self.sync_ticker();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TimerEvent::PhaseCompleted {
                    completed,
                    next,
                    interval,
                } => {
                    let mut message = match completed {
                        Phase::Work => format!("Session complete! Time for a {}.", next.as_str()),
                        Phase::Break => "Break over. Back to work.".to_string(),
                    };
                    if self.snapshot().status == RunStatus::Paused {
                        message.push_str(" Press space to continue.");
                    }
                    self.status = Some(message);
                    self.recent.push_front(interval);
                    self.recent.truncate(RECENT_LIMIT);
                    self.refresh_stats();

                    if let Some(target) = self.cycles {
                        if self.snapshot().sessions_completed >= target {
                            debug!(target, "cycle target reached");
                            self.should_quit = true;
                        }
                    }
                }
                TimerEvent::SettingsRejected { reason } => {
                    self.status = Some(format!("Rejected: {reason}"));
                }
                TimerEvent::PersistenceFailed { message } => {
                    self.status = Some(format!("Not saved: {message}"));
                }
                TimerEvent::Tick { .. } => {}
            }
        }
    }

    fn refresh_stats(&mut self) {
        match self.engine.stats_with_goal(self.weekly_goal_minutes) {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => warn!(error = %e, "failed to compute stats"),
        }
    }

    /// Hold a tick source exactly while the engine runs.
    fn sync_ticker(&mut self) {
        match (self.engine.is_running(), self.ticker.is_some()) {
            (true, false) => self.ticker = Some(TickSource::every_second()),
            (false, true) => {
                if let Some(ticker) = self.ticker.take() {
                    ticker.stop();
                }
            }
            _ => {}
        }
    }

    /// Release the tick source.
    pub fn shutdown(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::{MemoryStore, TimerConfig};

    fn app(work: u32, brk: u32) -> App {
        let config = TimerConfig::new(work, brk).unwrap();
        App::new(TimerEngine::new(config, MemoryStore::new()), 600, None)
    }

    #[test]
    fn test_ticker_follows_running_state() {
        let mut app = app(120, 60);
        assert!(!app.is_ticking());

        app.toggle();
        assert!(app.is_ticking());
        assert_eq!(app.snapshot().status, RunStatus::Running);

        app.toggle();
        assert!(!app.is_ticking());
        assert_eq!(app.snapshot().status, RunStatus::Paused);

        app.toggle();
        app.reset();
        assert!(!app.is_ticking());
        assert_eq!(app.snapshot().remaining_seconds, 120);
    }

    #[test]
    fn test_completion_updates_stats_and_log() {
        let mut app = app(60, 60);
        assert_eq!(app.stats.as_ref().unwrap().total_sessions, 0);

        app.toggle();
        app.advance(60);

        assert_eq!(app.snapshot().phase, Phase::Break);
        assert_eq!(app.recent.len(), 1);
        assert_eq!(app.stats.as_ref().unwrap().total_sessions, 1);
        assert!(app.status.as_deref().unwrap().contains("complete"));
        app.shutdown();
    }

    #[test]
    fn test_cycle_target_quits() {
        let config = TimerConfig::new(2, 1).unwrap();
        let mut app = App::new(TimerEngine::new(config, MemoryStore::new()), 600, Some(2));
        app.toggle();

        app.advance(3);
        assert!(!app.should_quit);
        app.advance(2);
        assert!(app.should_quit);
        app.shutdown();
    }

    #[test]
    fn test_tick_backlog_stops_at_cycle_target() {
        let config = TimerConfig::new(2, 1).unwrap();
        let mut app = App::new(TimerEngine::new(config, MemoryStore::new()), 600, Some(1));
        app.toggle();

        app.advance(10);

        let state = app.snapshot();
        assert!(app.should_quit);
        assert_eq!(state.sessions_completed, 1);
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.remaining_seconds, 1);
        assert_eq!(app.recent.len(), 1);
        app.shutdown();
    }

    #[test]
    fn test_adjust_durations() {
        let mut app = app(120, 60);
        app.adjust_work(ADJUST_STEP_SECONDS);
        assert_eq!(app.durations(), (180, 60));
        assert_eq!(app.snapshot().remaining_seconds, 180);

        app.adjust_break(-ADJUST_STEP_SECONDS);
        assert!(app.status.as_deref().unwrap().starts_with("Rejected"));
        assert_eq!(app.durations(), (180, 60));
    }

    #[test]
    fn test_recent_log_is_bounded() {
        let mut app = app(1, 1);
        app.toggle();
        app.advance(20);
        assert_eq!(app.recent.len(), RECENT_LIMIT);
        app.shutdown();
    }
}
