//! Application context for the Qrseal CLI.
//!
//! Provides a unified context that combines CLI arguments with
//! lazily-loaded configuration.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use qrseal_core::keys::{FileKeyStore, KeyManager};
use qrseal_core::{Settings, Workflow};

use crate::cli::Cli;
use crate::config::QrsealConfig;
use crate::ui::{UiContext, UiFlags};

use super::resolver::{load_config, resolve_key_dir};

/// Application context that bundles CLI args with configuration.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    ui: UiContext,
    config: OnceCell<QrsealConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            ui: UiContext::from_env(UiFlags {
                no_color: cli.no_color,
                ascii: cli.ascii,
                quiet: cli.quiet,
            }),
            config: OnceCell::new(),
        }
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// Check if interactive prompts were disabled.
    pub fn no_input(&self) -> bool {
        self.cli.no_input
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&QrsealConfig> {
        self.config.get_or_try_init(load_config)
    }

    pub fn key_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_key_dir(self.cli, self.config()?)
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        Ok(self.config()?.settings())
    }

    /// A key manager over the resolved key directory, with nothing loaded yet.
    pub fn key_manager(&self) -> anyhow::Result<KeyManager<FileKeyStore>> {
        let dir = self.key_dir()?;
        tracing::debug!(dir = %dir.display(), "using key directory");
        Ok(KeyManager::new(FileKeyStore::new(dir)))
    }

    /// A workflow with any persisted key pair loaded. Never generates keys.
    pub fn workflow(&self) -> anyhow::Result<Workflow<FileKeyStore>> {
        self.workflow_with(self.settings()?)
    }

    /// Like `workflow`, with settings adjusted by command flags.
    pub fn workflow_with(&self, settings: Settings) -> anyhow::Result<Workflow<FileKeyStore>> {
        let mut keys = self.key_manager()?;
        keys.load()?;
        Ok(Workflow::new(keys, settings))
    }
}
