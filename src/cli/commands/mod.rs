//! Command implementations for studyfocus.
//!
//! This module contains the implementation of all CLI commands.

mod completions;
mod config;
mod history;
mod run;
mod stats;

pub use completions::{completions, generate_completions};
pub use config::config;
pub use history::{clear, history};
pub use run::{drive_plain, run};
pub use stats::stats;

use crate::cli::args::{Cli, OutputFormat};
use crate::config::{Config, Paths, StoreBackend};
use crate::error::StudyFocusError;
use crate::features::focus::SessionStore;
use crate::storage::open_store;

/// Resolved paths, configuration, and global flags shared by commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Data directory layout.
    pub paths: Paths,
    /// Loaded configuration.
    pub config: Config,
    /// Effective output format.
    pub format: OutputFormat,
    /// Effective store backend.
    pub backend: StoreBackend,
}

impl Context {
    /// Resolve the context from command-line flags and the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// config file cannot be parsed.
    pub fn from_cli(cli: &Cli) -> Result<Self, StudyFocusError> {
        let paths = match &cli.home {
            Some(home) => Paths::with_root(home.clone()),
            None => Paths::new()?,
        };
        let config = Config::load(&paths)?;
        Ok(Self::new(paths, config, cli.output, cli.store))
    }

    /// Build a context, letting flags override the config file.
    #[must_use]
    pub fn new(
        paths: Paths,
        config: Config,
        output: Option<OutputFormat>,
        store: Option<StoreBackend>,
    ) -> Self {
        let format = output.unwrap_or(config.general.default_output);
        let backend = store.unwrap_or(config.storage.backend);
        Self {
            paths,
            config,
            format,
            backend,
        }
    }

    /// Open the effective session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn open_store(&self) -> Result<Box<dyn SessionStore>, StudyFocusError> {
        open_store(self.backend, &self.paths, &self.config.storage.scope)
    }
}
