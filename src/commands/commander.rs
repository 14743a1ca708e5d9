//! Command startup sequence.
//!
//! This module provides the [`Commander`], which runs the one-time sequence
//! that turns the commands directory into a ready [`Dispatcher`]:
//!
//! ```text
//! load manifests → bulk register schemas → Dispatcher
//! ```
//!
//! Both steps are strictly sequenced; the dispatcher only exists once the
//! registration call has returned.

use anyhow::Context;
use async_trait::async_trait;
use log::info;
use mockall::automock;

use crate::commands::{CommandLoader, CommandSchema, Dispatcher, ErrorPolicy, LoadOutcome};

/// Remote side of command registration.
///
/// Implementations replace the whole command set of their scope with
/// `schemas`: a command missing from the list is removed remotely.
#[automock]
#[async_trait]
pub trait CommandRegistrar: Send + Sync {
    /// Registers `schemas` in one bulk call, returning how many commands the
    /// remote side now knows.
    async fn register(&self, schemas: &[CommandSchema]) -> anyhow::Result<usize>;
}

/// Loads and registers the commands, then hands out the dispatcher.
pub struct Commander {
    /// Manifest loader for the configured directory
    loader: CommandLoader,
    /// Error policy given to the dispatcher
    policy: ErrorPolicy,
}

impl Commander {
    pub fn new(loader: CommandLoader, policy: ErrorPolicy) -> Self {
        Commander { loader, policy }
    }

    /// Runs the load-then-register sequence.
    ///
    /// # Returns
    ///
    /// * `Ok(Dispatcher)` - Commands are registered and ready to be dispatched.
    ///   When the directory has no manifest at its top level, the dispatcher
    ///   is empty and no registration call is made.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`](crate::commands::LoadError) and any registration
    /// failure. Nothing is retried: the caller is expected to stop the bot.
    pub async fn prepare(&self, registrar: &dyn CommandRegistrar) -> anyhow::Result<Dispatcher> {
        info!(
            "loading commands from {}",
            self.loader.directory().display()
        );

        let loaded = match self.loader.load().await? {
            LoadOutcome::Empty => return Ok(Dispatcher::empty(self.policy)),
            LoadOutcome::Loaded(loaded) => loaded,
        };

        let registered = registrar
            .register(&loaded.schemas)
            .await
            .context("failed to register slash commands")?;
        info!(
            "slash commands registered: {} commands, {} handlers",
            registered,
            loaded.registry.len()
        );

        Ok(Dispatcher::new(loaded.registry, loaded.schemas, self.policy))
    }
}
