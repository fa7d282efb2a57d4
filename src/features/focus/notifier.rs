//! Phase-completion notifications.
//!
//! Notifiers are a side channel. The engine ignores their failures.

use std::io::Write;
use std::process::Command;

use tracing::debug;

use super::interval::Phase;
use crate::error::StudyFocusError;

/// Something that tells the user a phase ended.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Announce that `completed` finished and `next` begins.
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Notifier` if the notification cannot be delivered.
    fn notify(&self, completed: Phase, next: Phase) -> Result<(), StudyFocusError>;
}

/// Notification title and body for a transition.
#[must_use]
pub fn notification_text(completed: Phase, next: Phase) -> (String, String) {
    let title = match completed {
        Phase::Work => "Focus session complete".to_string(),
        Phase::Break => "Break is over".to_string(),
    };
    let body = match next {
        Phase::Work => "Time to focus again.".to_string(),
        Phase::Break => "Take a short break.".to_string(),
    };
    (title, body)
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn notify(&self, _completed: Phase, _next: Phase) -> Result<(), StudyFocusError> {
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|()| stderr.flush())
            .map_err(|e| StudyFocusError::Notifier(format!("Failed to ring bell: {e}")))
    }
}

/// Desktop notification through the platform's command-line tool.
///
/// Uses `osascript` on macOS and `notify-send` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn command(title: &str, body: &str) -> Command {
        if cfg!(target_os = "macos") {
            let script = format!(
                r#"display notification "{}" with title "{}""#,
                body.replace('"', r#"\""#),
                title.replace('"', r#"\""#)
            );
            let mut cmd = Command::new("osascript");
            cmd.arg("-e").arg(script);
            cmd
        } else {
            let mut cmd = Command::new("notify-send");
            cmd.arg("--app-name=studyfocus").arg(title).arg(body);
            cmd
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, completed: Phase, next: Phase) -> Result<(), StudyFocusError> {
        let (title, body) = notification_text(completed, next);
        let output = Self::command(&title, &body)
            .output()
            .map_err(|e| StudyFocusError::Notifier(format!("Failed to run notifier: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(StudyFocusError::Notifier(stderr.trim().to_string()))
        }
    }
}

/// Fans a notification out to several notifiers.
///
/// Every notifier is tried; the first failure is returned afterwards.
#[derive(Default)]
pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl CompositeNotifier {
    /// Create an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notifier.
    #[must_use]
    pub fn with(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifiers.push(Box::new(notifier));
        self
    }

    /// Check if no notifiers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Notifier for CompositeNotifier {
    fn notify(&self, completed: Phase, next: Phase) -> Result<(), StudyFocusError> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(completed, next) {
                debug!(error = %e, "notifier failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_text() {
        let (title, body) = notification_text(Phase::Work, Phase::Break);
        assert_eq!(title, "Focus session complete");
        assert!(body.contains("break"));
    }

    #[test]
    fn test_composite_tries_every_notifier() {
        let mut failing = MockNotifier::new();
        failing
            .expect_notify()
            .times(1)
            .returning(|_, _| Err(StudyFocusError::Notifier("no display".to_string())));

        let mut working = MockNotifier::new();
        working.expect_notify().times(1).returning(|_, _| Ok(()));

        let composite = CompositeNotifier::new().with(failing).with(working);
        let err = composite.notify(Phase::Work, Phase::Break).unwrap_err();
        assert!(matches!(err, StudyFocusError::Notifier(_)));
    }

    #[test]
    fn test_empty_composite_succeeds() {
        let composite = CompositeNotifier::new();
        assert!(composite.is_empty());
        assert!(composite.notify(Phase::Break, Phase::Work).is_ok());
    }
}
