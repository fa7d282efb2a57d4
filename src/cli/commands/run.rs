//! Run command implementation.
//!
//! Builds a timer engine from the configuration and drives it either through
//! the interactive TUI or as a plain stream of status lines.

use std::io::Write;
use std::sync::mpsc;
use std::time::Duration;

use colored::Colorize;
use tracing::info;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::cli::commands::Context;
use crate::error::StudyFocusError;
use crate::features::focus::{
    format_duration, parse_phase_seconds, render_progress_bar, Phase, RunStatus, TickSource,
    TimerConfig, TimerEngine, TimerEvent, TimerState,
};
use crate::output::to_json;
use crate::tui::{self, App};

/// Longest wait for a tick before checking again.
const TICK_WAIT: Duration = Duration::from_secs(2);

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the durations are invalid, the store cannot be
/// opened, or the terminal fails.
pub fn run(ctx: &Context, args: &RunArgs) -> Result<String, StudyFocusError> {
    let config = timer_config(ctx, args)?;
    let store = ctx.open_store()?;

    let mut engine = TimerEngine::new(config, store).with_scope(&ctx.config.storage.scope);
    if let Some(notifier) = ctx.config.notifications.build_notifier() {
        engine = engine.with_notifier(notifier);
    }

    info!(
        work = config.work_duration_seconds(),
        brk = config.break_duration_seconds(),
        plain = args.plain,
        "starting timer"
    );

    let state = if args.plain {
        let mut stdout = std::io::stdout();
        let ticker = TickSource::every_second();
        let state = drive_plain(
            engine,
            || ticker.wait(TICK_WAIT),
            &mut stdout,
            args.cycles,
            ctx.format,
        )?;
        ticker.stop();
        state
    } else {
        let mut app = App::new(engine, ctx.config.stats.weekly_goal_minutes, args.cycles);
        tui::run(&mut app)?;
        app.snapshot()
    };

    summarize(&state, ctx.format)
}

/// Effective timer settings: config file, then command-line overrides.
fn timer_config(ctx: &Context, args: &RunArgs) -> Result<TimerConfig, StudyFocusError> {
    let mut settings = ctx.config.timer;
    if let Some(work) = &args.work {
        settings.work_seconds = parse_phase_seconds(work)?;
    }
    if let Some(brk) = &args.break_duration {
        settings.break_seconds = parse_phase_seconds(brk)?;
    }
    if args.no_auto_continue {
        settings.auto_continue = false;
    }
    settings.timer_config()
}

/// Run the engine headless, writing one line per tick to `out`.
///
/// `next_tick` blocks until a tick is due and returns `false` on timeout.
/// Stops after `cycles` completed work phases, or when the engine stops
/// running on its own (manual continue).
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn drive_plain<W: Write>(
    mut engine: TimerEngine,
    mut next_tick: impl FnMut() -> bool,
    out: &mut W,
    cycles: Option<u32>,
    format: OutputFormat,
) -> Result<TimerState, StudyFocusError> {
    let (tx, rx) = mpsc::channel();
    engine.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    engine.start();
    while engine.is_running() {
        if !next_tick() {
            continue;
        }
        engine.tick();

        for event in rx.try_iter() {
            write_event(out, &event, format)?;
        }
        out.flush()?;

        if cycles.is_some_and(|target| engine.snapshot().sessions_completed >= target) {
            break;
        }
    }

    Ok(engine.snapshot())
}

fn write_event<W: Write>(out: &mut W, event: &TimerEvent, format: OutputFormat) -> Result<(), StudyFocusError> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
        return Ok(());
    }

    match event {
        TimerEvent::Tick {
            phase,
            remaining_seconds,
        } => {
            let remaining = format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60);
            writeln!(out, "{:<6} {}", phase.as_str(), remaining)?;
        }
        TimerEvent::PhaseCompleted {
            completed, next, ..
        } => {
            let line = match completed {
                Phase::Work => format!("✅ Work complete. {} begins.", next.display_name()),
                Phase::Break => format!("⏰ Break over. {} begins.", next.display_name()),
            };
            writeln!(out, "{}", line.green())?;
        }
        TimerEvent::SettingsRejected { reason } => {
            writeln!(out, "{}", format!("Settings rejected: {reason}").yellow())?;
        }
        TimerEvent::PersistenceFailed { message } => {
            writeln!(out, "{}", format!("Not saved: {message}").yellow())?;
        }
    }
    Ok(())
}

/// Final summary after the timer stops.
fn summarize(state: &TimerState, format: OutputFormat) -> Result<String, StudyFocusError> {
    match format {
        OutputFormat::Json => to_json(state),
        OutputFormat::Pretty => {
            let mut output = Vec::new();
            output.push(format!(
                "🎯 {} session{} completed",
                state.sessions_completed,
                if state.sessions_completed == 1 { "" } else { "s" }
            ));
            output.push(format!("   Focus time: {}", format_duration(state.total_focus())));

            if state.status != RunStatus::Idle {
                output.push(format!(
                    "   Stopped in {}: {} {} left",
                    state.phase.as_str(),
                    render_progress_bar(state.progress(), 20),
                    state.format_remaining()
                ));
            }

            output.push(String::new());
            output.push("   Use 'studyfocus stats' to see your progress".dimmed().to_string());
            Ok(output.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::MemoryStore;

    fn engine(work: u32, brk: u32, auto_continue: bool) -> TimerEngine {
        let config = TimerConfig::new(work, brk)
            .unwrap()
            .with_auto_continue(auto_continue);
        TimerEngine::new(config, MemoryStore::new())
    }

    #[test]
    fn test_plain_mode_stops_after_cycles() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let state = drive_plain(engine(2, 1, true), || true, &mut out, Some(2), OutputFormat::Pretty)
            .unwrap();

        assert_eq!(state.sessions_completed, 2);
        assert_eq!(state.phase, Phase::Break);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("work   00:01"));
        assert_eq!(text.matches("Work complete").count(), 2);
        assert_eq!(text.matches("Break over").count(), 1);
    }

    #[test]
    fn test_plain_mode_stops_when_manual_continue() {
        let mut out = Vec::new();
        let state = drive_plain(engine(2, 1, false), || true, &mut out, None, OutputFormat::Pretty)
            .unwrap();

        assert_eq!(state.sessions_completed, 1);
        assert_eq!(state.status, RunStatus::Paused);
    }

    #[test]
    fn test_plain_mode_json_lines() {
        let mut out = Vec::new();
        drive_plain(engine(1, 1, true), || true, &mut out, Some(1), OutputFormat::Json).unwrap();

        let text = String::from_utf8(out).unwrap();
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "tick");
        assert_eq!(events[1]["event"], "phase_completed");
        assert_eq!(events[1]["interval"]["type"], "work");
    }

    #[test]
    fn test_summary_json() {
        let state = engine(60, 30, true).snapshot();
        let value: serde_json::Value = serde_json::from_str(&summarize(&state, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(value["remaining_seconds"], 60);
        assert_eq!(value["sessions_completed"], 0);
    }
}
