//! studyfocus - A Pomodoro-style focus timer for the terminal
//!
//! This crate provides the timer engine, session stores, statistics, and
//! the command-line and TUI hosts that drive them.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::StudyFocusError;
pub use features::focus::{SessionStore, TimerConfig, TimerEngine, TimerEvent, TimerState};
