//! Configuration management for studyfocus.
//!
//! This module handles loading and saving configuration from `~/.studyfocus/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{
    ColorSetting, Config, GeneralConfig, NotificationSettings, StatsConfig, StorageSettings,
    StoreBackend, TimerSettings,
};
