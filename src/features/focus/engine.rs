//! The focus timer state machine.
//!
//! [`TimerEngine`] drives a countdown through alternating work and break
//! phases. The host calls [`TimerEngine::tick`] once per second while the
//! engine runs; every completed phase is appended to the session store
//! exactly once.
//!
//! ```text
//!            start               pause
//!   Idle ───────────► Running ─────────► Paused
//!    ▲                  │  ▲                │
//!    │      reset       │  └──── start ─────┘
//!    └──────────────────┴───────────────────┘
//! ```

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::interval::{FocusInterval, Phase};
use super::notifier::Notifier;
use super::stats::FocusStats;
use super::store::SessionStore;
use super::timer::{RunStatus, TimerConfig, TimerState};
use crate::error::StudyFocusError;

/// Scope used when the host does not set one.
pub const DEFAULT_SCOPE: &str = "local";

/// Something the host may want to render or react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// The countdown advanced by one second.
    Tick {
        /// Phase being counted down
        phase: Phase,
        /// Seconds left after this tick
        remaining_seconds: u32,
    },
    /// A phase ran out and the engine moved on to the next one.
    PhaseCompleted {
        /// The phase that finished
        completed: Phase,
        /// The phase now loaded
        next: Phase,
        /// The record written for the finished phase
        interval: FocusInterval,
    },
    /// New settings were refused; the previous ones stay in force.
    SettingsRejected {
        /// Why the settings were refused
        reason: String,
    },
    /// A completed interval could not be stored. The timer is unaffected.
    PersistenceFailed {
        /// Store error message
        message: String,
    },
}

type Listener = Box<dyn FnMut(&TimerEvent)>;

/// Work/break countdown with session persistence.
pub struct TimerEngine {
    config: TimerConfig,
    store: Box<dyn SessionStore>,
    notifier: Option<Box<dyn Notifier>>,
    listeners: Vec<Listener>,
    scope: String,
    phase: Phase,
    status: RunStatus,
    remaining_seconds: u32,
    phase_length_seconds: u32,
    sessions_completed: u32,
    total_focus_seconds: u64,
}

impl TimerEngine {
    /// Create an idle engine at the start of a work phase.
    pub fn new(config: TimerConfig, store: impl SessionStore + 'static) -> Self {
        let work = config.work_duration_seconds();
        Self {
            config,
            store: Box::new(store),
            notifier: None,
            listeners: Vec::new(),
            scope: DEFAULT_SCOPE.to_string(),
            phase: Phase::Work,
            status: RunStatus::Idle,
            remaining_seconds: work,
            phase_length_seconds: work,
            sessions_completed: 0,
            total_focus_seconds: 0,
        }
    }

    /// Attach a notifier fired on every phase completion.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Set the scope key recorded on new intervals.
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    /// Register a listener. Events are delivered synchronously, in order.
    pub fn subscribe(&mut self, listener: impl FnMut(&TimerEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Start or resume the countdown. No-op while running.
    pub fn start(&mut self) {
        if self.status == RunStatus::Running {
            return;
        }
        debug!(phase = %self.phase, remaining = self.remaining_seconds, "timer started");
        self.status = RunStatus::Running;
    }

    /// Pause the countdown, keeping the remaining time. No-op unless running.
    pub fn pause(&mut self) {
        if self.status != RunStatus::Running {
            return;
        }
        debug!(phase = %self.phase, remaining = self.remaining_seconds, "timer paused");
        self.status = RunStatus::Paused;
    }

    /// Return to an idle work phase. Completed-session counters are kept.
    pub fn reset(&mut self) {
        self.status = RunStatus::Idle;
        self.phase = Phase::Work;
        self.load_phase_duration();
        debug!(remaining = self.remaining_seconds, "timer reset");
    }

    /// Advance the countdown by one second. Ignored unless running.
    ///
    /// When the countdown reaches zero the phase completes within the same
    /// call, so a running engine never reports zero seconds remaining.
    pub fn tick(&mut self) {
        if self.status != RunStatus::Running {
            return;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.emit(&TimerEvent::Tick {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
        });

        if self.remaining_seconds == 0 {
            self.complete_phase();
        }
    }

    /// Replace the phase durations.
    ///
    /// An idle engine picks up the new work duration immediately. A running
    /// or paused engine finishes its current phase at the old length; the
    /// new durations apply from the next phase on.
    pub fn apply_settings(&mut self, config: TimerConfig) {
        info!(
            work = config.work_duration_seconds(),
            brk = config.break_duration_seconds(),
            auto_continue = config.auto_continue(),
            "settings applied"
        );
        self.config = config;
        if self.status == RunStatus::Idle {
            self.load_phase_duration();
        }
    }

    /// Validate and apply raw durations in seconds.
    ///
    /// Invalid values leave the engine untouched and emit
    /// [`TimerEvent::SettingsRejected`].
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Config` if either duration is not positive.
    pub fn apply_raw_settings(
        &mut self,
        work_seconds: i64,
        break_seconds: i64,
    ) -> Result<(), StudyFocusError> {
        match TimerConfig::from_raw(work_seconds, break_seconds) {
            Ok(config) => {
                self.apply_settings(config.with_auto_continue(self.config.auto_continue()));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "settings rejected");
                self.emit(&TimerEvent::SettingsRejected {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Read-only copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            is_active: self.status == RunStatus::Running,
            sessions_completed: self.sessions_completed,
            total_focus_seconds: self.total_focus_seconds,
            status: self.status,
            phase_length_seconds: self.phase_length_seconds,
        }
    }

    /// Current settings.
    #[must_use]
    pub const fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Whether the countdown is advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Statistics over everything in the store, as of today.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Persistence` if the store cannot be read.
    pub fn stats(&self) -> Result<FocusStats, StudyFocusError> {
        self.store.compute_stats()
    }

    /// Like [`stats`](Self::stats), against a specific weekly goal.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Persistence` if the store cannot be read.
    pub fn stats_with_goal(&self, weekly_goal_minutes: u32) -> Result<FocusStats, StudyFocusError> {
        let intervals = self.store.all()?;
        Ok(FocusStats::from_intervals(
            &intervals,
            Local::now().date_naive(),
            weekly_goal_minutes,
        ))
    }

    /// The session store.
    #[must_use]
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// The session store, mutably (for bulk clear).
    pub fn store_mut(&mut self) -> &mut dyn SessionStore {
        self.store.as_mut()
    }

    fn load_phase_duration(&mut self) {
        let seconds = self.config.duration_for(self.phase);
        self.remaining_seconds = seconds;
        self.phase_length_seconds = seconds;
    }

    fn complete_phase(&mut self) {
        let completed = self.phase;
        let next = completed.next();
        let interval = FocusInterval::completed_now(&self.scope, completed, self.phase_length_seconds);

        if completed == Phase::Work {
            self.sessions_completed = self.sessions_completed.saturating_add(1);
            self.total_focus_seconds += u64::from(self.phase_length_seconds);
        }

        // One attempt per completed phase; a retry could duplicate records
        let stored = self.store.append(&interval);

        self.phase = next;
        self.load_phase_duration();
        if !self.config.auto_continue() {
            self.status = RunStatus::Paused;
        }

        info!(
            completed = %completed,
            next = %next,
            seconds = interval.duration_seconds,
            sessions = self.sessions_completed,
            "phase completed"
        );

        self.emit(&TimerEvent::PhaseCompleted {
            completed,
            next,
            interval,
        });

        if let Err(e) = stored {
            warn!(error = %e, "failed to store completed interval");
            self.emit(&TimerEvent::PersistenceFailed {
                message: e.to_string(),
            });
        }

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(completed, next) {
                debug!(error = %e, "notification failed");
            }
        }
    }

    fn emit(&mut self, event: &TimerEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("state", &self.snapshot())
            .field("scope", &self.scope)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::features::focus::notifier::MockNotifier;
    use crate::features::focus::store::{MemoryStore, MockSessionStore};

    fn config(work: u32, brk: u32) -> TimerConfig {
        TimerConfig::new(work, brk).unwrap()
    }

    fn recorded(engine: &mut TimerEngine) -> Rc<RefCell<Vec<TimerEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    fn completed_phases(events: &[TimerEvent]) -> Vec<(Phase, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::PhaseCompleted { completed, interval, .. } => {
                    Some((*completed, interval.duration_seconds))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let engine = TimerEngine::new(config(1500, 300), MemoryStore::new());
        let state = engine.snapshot();

        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_seconds, 1500);
        assert!(!state.is_active);
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.sessions_completed, 0);
        assert_eq!(state.total_focus_seconds, 0);
    }

    #[test]
    fn test_work_break_scenario() {
        let mut engine = TimerEngine::new(config(2, 1), MemoryStore::new());
        let events = recorded(&mut engine);

        engine.start();
        engine.tick();
        assert_eq!(engine.snapshot().remaining_seconds, 1);
        engine.tick();

        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.remaining_seconds, 1);
        assert_eq!(state.sessions_completed, 1);
        assert_eq!(state.total_focus_seconds, 2);
        assert!(state.is_active);

        engine.tick();
        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_seconds, 2);
        assert_eq!(state.sessions_completed, 1);
        assert_eq!(state.total_focus_seconds, 2);

        assert_eq!(
            completed_phases(&events.borrow()),
            vec![(Phase::Work, 2), (Phase::Break, 1)]
        );

        let stored = engine.store().all().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].kind, Phase::Work);
        assert_eq!(stored[0].duration_seconds, 2);
        assert_eq!(stored[1].kind, Phase::Break);
        assert_eq!(stored[1].duration_seconds, 1);
    }

    #[test]
    fn test_tick_decrements_by_one_and_never_goes_negative() {
        let mut engine = TimerEngine::new(config(5, 3), MemoryStore::new());
        let events = recorded(&mut engine);
        engine.start();

        let mut previous = engine.snapshot();
        for _ in 0..40 {
            engine.tick();
            let current = engine.snapshot();
            if current.phase == previous.phase {
                assert_eq!(current.remaining_seconds, previous.remaining_seconds - 1);
            } else {
                assert_eq!(previous.remaining_seconds, 1);
                assert_eq!(
                    current.remaining_seconds,
                    engine.config().duration_for(current.phase)
                );
            }
            assert!(current.remaining_seconds > 0);
            previous = current;
        }

        let ticks = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TimerEvent::Tick { .. }))
            .count();
        assert_eq!(ticks, 40);
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let mut engine = TimerEngine::new(config(10, 5), MemoryStore::new());
        let events = recorded(&mut engine);

        engine.tick();
        assert_eq!(engine.snapshot().remaining_seconds, 10);

        engine.start();
        engine.tick();
        engine.pause();
        engine.tick();
        assert_eq!(engine.snapshot().remaining_seconds, 9);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_start_and_pause_are_idempotent() {
        let mut engine = TimerEngine::new(config(10, 5), MemoryStore::new());

        engine.pause();
        assert_eq!(engine.snapshot().status, RunStatus::Idle);

        engine.start();
        engine.start();
        assert_eq!(engine.snapshot().status, RunStatus::Running);

        engine.pause();
        engine.pause();
        assert_eq!(engine.snapshot().status, RunStatus::Paused);
    }

    #[test]
    fn test_pause_resume_keeps_remaining() {
        let mut engine = TimerEngine::new(config(60, 5), MemoryStore::new());
        engine.start();
        for _ in 0..17 {
            engine.tick();
        }
        engine.pause();
        let paused = engine.snapshot().remaining_seconds;
        assert_eq!(paused, 43);

        engine.start();
        assert_eq!(engine.snapshot().remaining_seconds, paused);
        assert!(engine.snapshot().is_active);
    }

    #[test]
    fn test_reset_from_every_state() {
        let cfg = config(4, 2);
        let mut engine = TimerEngine::new(cfg, MemoryStore::new());

        let check = |engine: &TimerEngine| {
            let state = engine.snapshot();
            assert_eq!(state.phase, Phase::Work);
            assert_eq!(state.remaining_seconds, 4);
            assert!(!state.is_active);
            assert_eq!(state.status, RunStatus::Idle);
        };

        engine.reset();
        check(&engine);

        engine.start();
        engine.tick();
        engine.reset();
        check(&engine);

        // Mid-break, paused
        engine.start();
        for _ in 0..5 {
            engine.tick();
        }
        engine.pause();
        assert_eq!(engine.snapshot().phase, Phase::Break);
        engine.reset();
        check(&engine);

        // Counters survive the reset
        assert_eq!(engine.snapshot().sessions_completed, 1);
        assert_eq!(engine.snapshot().total_focus_seconds, 4);
    }

    #[test]
    fn test_apply_settings_when_idle_resets_remaining() {
        let mut engine = TimerEngine::new(config(1500, 300), MemoryStore::new());
        engine.apply_settings(config(3000, 600));
        assert_eq!(engine.snapshot().remaining_seconds, 3000);
        assert_eq!(engine.snapshot().status, RunStatus::Idle);
    }

    #[test]
    fn test_apply_settings_does_not_truncate_running_phase() {
        let mut engine = TimerEngine::new(config(12, 3), MemoryStore::new());
        engine.start();
        engine.tick();
        engine.tick();
        assert_eq!(engine.snapshot().remaining_seconds, 10);

        engine.apply_settings(config(5, 2));
        assert_eq!(engine.snapshot().remaining_seconds, 10);

        for _ in 0..9 {
            engine.tick();
        }
        assert_eq!(engine.snapshot().phase, Phase::Work);
        assert_eq!(engine.snapshot().remaining_seconds, 1);

        engine.tick();
        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.remaining_seconds, 2);
        // The finished phase is recorded at the length it actually ran
        assert_eq!(state.total_focus_seconds, 12);

        engine.reset();
        assert_eq!(engine.snapshot().remaining_seconds, 5);
    }

    #[test]
    fn test_apply_settings_while_paused_waits_for_next_phase() {
        let mut engine = TimerEngine::new(config(10, 3), MemoryStore::new());
        engine.start();
        engine.tick();
        engine.pause();

        engine.apply_settings(config(20, 3));
        assert_eq!(engine.snapshot().remaining_seconds, 9);
        assert_eq!(engine.snapshot().status, RunStatus::Paused);
    }

    #[test]
    fn test_invalid_raw_settings_are_rejected() {
        let mut engine = TimerEngine::new(config(10, 3), MemoryStore::new());
        let events = recorded(&mut engine);

        let err = engine.apply_raw_settings(0, 3).unwrap_err();
        assert!(err.is_config());
        assert!(engine.apply_raw_settings(10, -1).is_err());

        assert_eq!(engine.config().work_duration_seconds(), 10);
        assert_eq!(engine.config().break_duration_seconds(), 3);
        assert_eq!(engine.snapshot().remaining_seconds, 10);

        let rejected = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TimerEvent::SettingsRejected { .. }))
            .count();
        assert_eq!(rejected, 2);

        engine.apply_raw_settings(30, 6).unwrap();
        assert_eq!(engine.snapshot().remaining_seconds, 30);
    }

    #[test]
    fn test_manual_continue_pauses_after_flip() {
        let cfg = config(2, 1).with_auto_continue(false);
        let mut engine = TimerEngine::new(cfg, MemoryStore::new());
        engine.start();
        engine.tick();
        engine.tick();

        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.status, RunStatus::Paused);
        assert!(!state.is_active);

        // Further ticks do nothing until the user starts the break
        engine.tick();
        assert_eq!(engine.snapshot().remaining_seconds, 1);
        engine.start();
        engine.tick();
        assert_eq!(engine.snapshot().phase, Phase::Work);
    }

    #[test]
    fn test_store_failure_does_not_stop_timer() {
        let mut store = MockSessionStore::new();
        let mut calls = 0;
        store.expect_append().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(StudyFocusError::Persistence("disk full".to_string()))
            } else {
                Ok(())
            }
        });

        let mut engine = TimerEngine::new(config(1, 1), store);
        let events = recorded(&mut engine);
        engine.start();

        // Work completes with a failing store, break completes after recovery
        engine.tick();
        engine.tick();

        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.sessions_completed, 1);
        assert!(state.is_active);

        let events = events.borrow();
        let failures = events
            .iter()
            .filter(|e| matches!(e, TimerEvent::PersistenceFailed { .. }))
            .count();
        assert_eq!(failures, 1);
        assert_eq!(completed_phases(&events).len(), 2);
    }

    #[test]
    fn test_one_append_per_completed_phase() {
        let mut store = MockSessionStore::new();
        store
            .expect_append()
            .withf(|interval| interval.duration_seconds > 0)
            .times(4)
            .returning(|_| Ok(()));

        let mut engine = TimerEngine::new(config(2, 1), store);
        engine.start();
        for _ in 0..6 {
            engine.tick();
        }
        assert_eq!(engine.snapshot().sessions_completed, 2);
    }

    #[test]
    fn test_notifier_failure_is_swallowed() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _| Err(StudyFocusError::Notifier("no display".to_string())));

        let mut engine =
            TimerEngine::new(config(1, 1), MemoryStore::new()).with_notifier(notifier);
        engine.start();
        engine.tick();

        let state = engine.snapshot();
        assert_eq!(state.phase, Phase::Break);
        assert!(state.is_active);
        assert_eq!(engine.store().all().unwrap().len(), 1);
    }

    #[test]
    fn test_intervals_carry_scope() {
        let mut engine = TimerEngine::new(config(1, 1), MemoryStore::new()).with_scope("desk");
        engine.start();
        engine.tick();
        assert_eq!(engine.store().all().unwrap()[0].scope, "desk");
    }

    #[test]
    fn test_stats_follow_the_store() {
        let mut engine = TimerEngine::new(config(60, 30), MemoryStore::new());
        assert_eq!(engine.stats().unwrap().total_sessions, 0);

        engine.start();
        for _ in 0..90 {
            engine.tick();
        }
        let stats = engine.stats().unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_minutes, 1);
        assert_eq!(stats.total_break_minutes, 1);

        let stats = engine.stats_with_goal(2).unwrap();
        assert_eq!(stats.weekly_goal_minutes, 2);
        assert!((stats.weekly_goal_percent - 50.0).abs() < f64::EPSILON);

        assert_eq!(engine.store_mut().clear().unwrap(), 2);
        assert_eq!(engine.stats().unwrap().total_sessions, 0);
    }
}
