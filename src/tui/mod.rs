//! Terminal User Interface (TUI) for studyfocus.
//!
//! Interactive countdown with phase progress, weekly stats, and keyboard
//! controls. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;
pub use event::{action_for, Action};

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use crate::error::StudyFocusError;

/// Run the TUI application until the user quits or the cycle target is hit.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(app: &mut App) -> Result<(), StudyFocusError> {
    enable_raw_mode()
        .map_err(|e| StudyFocusError::Config(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| StudyFocusError::Config(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| StudyFocusError::Config(format!("Failed to create terminal: {e}")))?;

    info!("tui started");
    let result = run_app(&mut terminal, app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    info!("tui stopped");

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), StudyFocusError> {
    while !app.should_quit {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| StudyFocusError::Config(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(app)? {
            match action {
                Action::Quit => break,
                Action::Toggle => app.toggle(),
                Action::Reset => app.reset(),
                Action::AdjustWork(delta) => app.adjust_work(delta),
                Action::AdjustBreak(delta) => app.adjust_break(delta),
            }
        }

        app.process_ticks();
    }

    Ok(())
}
