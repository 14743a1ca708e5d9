//! Bot module wrapping the Discord client.
//!
//! This module provides the [`Bot`] implementation that owns the serenity
//! client and drives the complete bot lifecycle: login, one-time command
//! startup and interaction dispatch.
//!
//! # Lifecycle
//!
//! ```text
//! Bot::new → Bot::start → gateway ready → load + register → listen
//! ```
//!
//! 1. **Connecting**: [`Bot::start`] logs in with the configured token and
//!    opens the gateway connection
//! 2. **Loading**: on the first `ready` event the presence is set, the
//!    commands directory is loaded and the schemas are registered on the guild
//! 3. **Listening**: every slash command interaction is dispatched to its
//!    handler until the process is terminated
//!
//! A failure during loading or registration is fatal: the gateway is shut
//! down and [`Bot::start`] returns the error.

use std::sync::Arc;

use anyhow::Context as _;
use log::{error, info};
use serenity::all::{ApplicationId, Client, GatewayIntents, GuildId};
use tokio::sync::mpsc;

use crate::{
    commands::{CommandLoader, Commander, ErrorPolicy, actions::builtin_handlers},
    config::Config,
    discord::{Handler, PresenceKind},
    lifecycle::Lifecycle,
    utils::resolve_from_cwd,
};

/// Discord bot wrapping one authenticated gateway session.
///
/// # Examples
///
/// ```no_run
/// # use herald::bot::Bot;
/// # use herald::config::Config;
/// # async fn example() -> Result<(), anyhow::Error> {
/// let config = Config::load("config.yaml")?;
///
/// let bot = Bot::new(config).await?;
/// bot.start().await?; // Runs until the gateway shuts down
/// # Ok(())
/// # }
/// ```
pub struct Bot {
    /// Serenity client, owner of the gateway and HTTP connections
    client: Client,
    /// Phase shared with the event handler
    lifecycle: Arc<Lifecycle>,
    /// Startup failures reported by the event handler
    fatal: mpsc::UnboundedReceiver<anyhow::Error>,
}

impl Bot {
    /// Creates the bot from its configuration.
    ///
    /// Nothing is sent to Discord yet: the client is only built, with the
    /// configured application id so that command registration is scoped to
    /// the right application.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved or the
    /// serenity client cannot be built (e.g. malformed token).
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let directory = resolve_from_cwd(&config.commands.directory)?;
        let policy = ErrorPolicy::from_debug(config.debug);
        let commander = Commander::new(CommandLoader::new(directory, builtin_handlers()), policy);

        let activity = config.presence.as_ref().and_then(|presence| {
            PresenceKind::from_code(presence.kind)
                .map(|kind| kind.to_activity(&presence.text, presence.url.as_deref()))
        });

        let lifecycle = Arc::new(Lifecycle::new());
        let (fatal_sender, fatal) = mpsc::unbounded_channel();

        let handler = Handler::new(
            commander,
            GuildId::new(config.discord.guild_id),
            activity,
            Arc::clone(&lifecycle),
            fatal_sender,
        );

        // Slash commands arrive as interactions, which need no intent
        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES;

        let client = Client::builder(&config.discord.token, intents)
            .application_id(ApplicationId::new(config.discord.application_id))
            .event_handler(handler)
            .await
            .context("failed to build discord client")?;

        Ok(Bot {
            client,
            lifecycle,
            fatal,
        })
    }

    /// Connects to Discord and runs until the session ends.
    ///
    /// # Errors
    ///
    /// - Login or gateway failures reported by serenity
    /// - Fatal startup failures: missing commands directory, invalid manifest,
    ///   duplicate command name or failed registration
    pub async fn start(mut self) -> Result<(), anyhow::Error> {
        self.lifecycle.connecting();
        info!("starting discord bot...");

        let shard_manager = Arc::clone(&self.client.shard_manager);

        tokio::select! {
            result = self.client.start() => {
                result.context("discord client stopped with an error")?;
                info!("discord client stopped");
            }
            Some(e) = self.fatal.recv() => {
                error!("stopping discord bot after startup failure");
                shard_manager.shutdown_all().await;
                return Err(e);
            }
        }

        Ok(())
    }
}
