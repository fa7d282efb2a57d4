//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::error::StudyFocusError;
use crate::tui::app::{App, ADJUST_STEP_SECONDS};

/// Key help shown in the status bar.
pub const HELP: &str =
    "space:start/pause | r:reset | w/W:work +/-1m | b/B:break +/-1m | q:quit";

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start or pause the timer.
    Toggle,
    /// Reset to an idle work phase.
    Reset,
    /// Change the work length by the given seconds.
    AdjustWork(i64),
    /// Change the break length by the given seconds.
    AdjustBreak(i64),
}

/// Map a key to an action.
#[must_use]
pub fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ' | 's' | 'p') | KeyCode::Enter => Some(Action::Toggle),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('w') => Some(Action::AdjustWork(ADJUST_STEP_SECONDS)),
        KeyCode::Char('W') => Some(Action::AdjustWork(-ADJUST_STEP_SECONDS)),
        KeyCode::Char('b') => Some(Action::AdjustBreak(ADJUST_STEP_SECONDS)),
        KeyCode::Char('B') => Some(Action::AdjustBreak(-ADJUST_STEP_SECONDS)),
        _ => None,
    }
}

/// Handle terminal events.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App) -> Result<Option<Action>, StudyFocusError> {
    // Short poll so pending ticks are applied promptly
    if !event::poll(Duration::from_millis(100))? {
        return Ok(None);
    }

    let Event::Key(key) = event::read()? else {
        return Ok(None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }

    if key.code == KeyCode::Char('?') {
        app.status = Some(HELP.to_string());
        return Ok(None);
    }

    Ok(action_for(key.code, key.modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert_eq!(action_for(KeyCode::Char('q'), KeyModifiers::NONE), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Esc, KeyModifiers::NONE), Some(Action::Quit));
        assert_eq!(
            action_for(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_timer_keys() {
        assert_eq!(action_for(KeyCode::Char(' '), KeyModifiers::NONE), Some(Action::Toggle));
        assert_eq!(action_for(KeyCode::Char('r'), KeyModifiers::NONE), Some(Action::Reset));
        assert_eq!(
            action_for(KeyCode::Char('W'), KeyModifiers::SHIFT),
            Some(Action::AdjustWork(-60))
        );
        assert_eq!(
            action_for(KeyCode::Char('b'), KeyModifiers::NONE),
            Some(Action::AdjustBreak(60))
        );
        assert_eq!(action_for(KeyCode::Char('z'), KeyModifiers::NONE), None);
    }
}
