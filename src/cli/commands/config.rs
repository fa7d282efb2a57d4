//! Config command implementation.

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::StudyFocusError;
use crate::features::focus::parse_phase_seconds;
use crate::output::format_config;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if a value is invalid or the config file cannot be written.
pub fn config(
    paths: &Paths,
    current: &Config,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, StudyFocusError> {
    match cmd {
        ConfigCommands::Show => format_config(current, paths, format),
        ConfigCommands::Path => Ok(paths.config_file.display().to_string()),
        ConfigCommands::Set {
            work,
            break_duration,
            auto_continue,
            goal,
            backend,
            scope,
        } => {
            let mut updated = current.clone();

            if let Some(work) = work {
                updated.timer.work_seconds = parse_phase_seconds(&work)?;
            }
            if let Some(brk) = break_duration {
                updated.timer.break_seconds = parse_phase_seconds(&brk)?;
            }
            if let Some(flag) = auto_continue {
                updated.timer.auto_continue = flag;
            }
            if let Some(goal) = goal {
                updated.stats.weekly_goal_minutes = goal;
            }
            if let Some(backend) = backend {
                updated.storage.backend = backend;
            }
            if let Some(scope) = scope {
                let scope = scope.trim();
                if scope.is_empty() {
                    return Err(StudyFocusError::Config("Scope must not be empty".to_string()));
                }
                updated.storage.scope = scope.to_string();
            }

            updated.timer.timer_config()?;
            updated.save(paths)?;
            tracing::info!(path = %paths.config_file.display(), "config saved");

            format_config(&updated, paths, format)
        }
    }
}
