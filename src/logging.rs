//! Logging initialization for studyfocus.
//!
//! Structured logging via `tracing`. Verbosity comes from `-v` flags and
//! can be overridden with `STUDYFOCUS_LOG` (any `EnvFilter` directive).

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::StudyFocusError;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "STUDYFOCUS_LOG";

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)))
}

/// Initializes the global tracing subscriber.
///
/// Logs go to stderr, or are appended to `log_file` when one is given
/// (the TUI owns the terminal while it runs).
///
/// Uses `try_init()` so calling this more than once is safe.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<(), StudyFocusError> {
    let show_target = verbosity >= 2;

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    StudyFocusError::Config(format!("Failed to open log file {}: {e}", path.display()))
                })?;

            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(verbosity))
                .with_ansi(false)
                .with_target(show_target)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let use_ansi = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(verbosity))
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }

    Ok(())
}
