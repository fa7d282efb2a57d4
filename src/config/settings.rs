//! Configuration settings for studyfocus.
//!
//! Settings are loaded from `<home>/config.yaml`. Every section and field
//! has a default, so a partial file only overrides what it names.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::StudyFocusError;
use crate::features::focus::timer::{DEFAULT_BREAK_SECONDS, DEFAULT_WORK_SECONDS};
use crate::features::focus::{
    CompositeNotifier, DesktopNotifier, TerminalBell, TimerConfig, DEFAULT_SCOPE,
    DEFAULT_WEEKLY_GOAL_MINUTES,
};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Timer durations.
    pub timer: TimerSettings,
    /// Phase-completion notifications.
    pub notifications: NotificationSettings,
    /// Session store selection.
    pub storage: StorageSettings,
    /// Statistics settings.
    pub stats: StatsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to the `colored` crate.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Timer durations in seconds.
///
/// Stored unvalidated; [`TimerSettings::timer_config`] rejects zero values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerSettings {
    /// Work phase length in seconds.
    #[serde(default = "default_work_seconds")]
    pub work_seconds: u32,
    /// Break phase length in seconds.
    #[serde(default = "default_break_seconds")]
    pub break_seconds: u32,
    /// Start the next phase automatically.
    #[serde(default = "default_true")]
    pub auto_continue: bool,
}

impl TimerSettings {
    /// Validate into a [`TimerConfig`].
    ///
    /// # Errors
    ///
    /// Returns `StudyFocusError::Config` if either duration is zero.
    pub fn timer_config(&self) -> Result<TimerConfig, StudyFocusError> {
        TimerConfig::new(self.work_seconds, self.break_seconds)
            .map(|config| config.with_auto_continue(self.auto_continue))
    }
}

/// Notification settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationSettings {
    /// Master switch.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell.
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Show a desktop notification.
    #[serde(default = "default_true")]
    pub desktop: bool,
}

impl NotificationSettings {
    /// Build the configured notifier, or `None` if nothing is enabled.
    #[must_use]
    pub fn build_notifier(&self) -> Option<CompositeNotifier> {
        if !self.enabled {
            return None;
        }

        let mut notifier = CompositeNotifier::new();
        if self.bell {
            notifier = notifier.with(TerminalBell);
        }
        if self.desktop {
            notifier = notifier.with(DesktopNotifier);
        }

        (!notifier.is_empty()).then_some(notifier)
    }
}

/// Which session store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// `SQLite` database file.
    #[default]
    Sqlite,
    /// JSON document file.
    Json,
    /// Nothing persisted beyond the process.
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Json => write!(f, "json"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Session store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageSettings {
    /// Store backend.
    pub backend: StoreBackend,
    /// Scope key grouping this device's intervals.
    #[serde(default = "default_scope")]
    pub scope: String,
}

/// Statistics settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatsConfig {
    /// Weekly focus goal in minutes.
    #[serde(default = "default_weekly_goal")]
    pub weekly_goal_minutes: u32,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_work_seconds() -> u32 {
    DEFAULT_WORK_SECONDS
}

const fn default_break_seconds() -> u32 {
    DEFAULT_BREAK_SECONDS
}

const fn default_true() -> bool {
    true
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

const fn default_weekly_goal() -> u32 {
    DEFAULT_WEEKLY_GOAL_MINUTES
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_seconds: default_work_seconds(),
            break_seconds: default_break_seconds(),
            auto_continue: default_true(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            bell: default_true(),
            desktop: default_true(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            scope: default_scope(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            weekly_goal_minutes: default_weekly_goal(),
        }
    }
}

impl Config {
    /// Load configuration from the config file under `paths`.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load(paths: &Paths) -> Result<Self, StudyFocusError> {
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, StudyFocusError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            StudyFocusError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents).map_err(|e| {
            StudyFocusError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to the config file under `paths`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self, paths: &Paths) -> Result<(), StudyFocusError> {
        paths.ensure_dirs()?;
        self.save_to_path(&paths.config_file)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), StudyFocusError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| StudyFocusError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            StudyFocusError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
