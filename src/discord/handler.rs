use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serenity::all::{ActivityData, Context, EventHandler, GuildId, Interaction, Ready};
use tokio::sync::{OnceCell, mpsc};

use crate::{
    commands::{Commander, DispatchOutcome, Dispatcher},
    discord::{GuildRegistrar, InteractionResponder, invocation_from},
    lifecycle::Lifecycle,
};

/// Discord bot event handler
pub struct Handler {
    /// Startup sequence run on the first ready event
    commander: Commander,
    /// Guild the commands are registered on
    guild_id: GuildId,
    /// Activity set once connected, if configured
    activity: Option<ActivityData>,
    /// Set once commands are loaded and registered
    dispatcher: OnceCell<Dispatcher>,
    lifecycle: Arc<Lifecycle>,
    /// Reports startup failures to [`Bot::start`](crate::bot::Bot::start)
    fatal: mpsc::UnboundedSender<anyhow::Error>,
}

impl Handler {
    pub fn new(
        commander: Commander,
        guild_id: GuildId,
        activity: Option<ActivityData>,
        lifecycle: Arc<Lifecycle>,
        fatal: mpsc::UnboundedSender<anyhow::Error>,
    ) -> Self {
        Handler {
            commander,
            guild_id,
            activity,
            dispatcher: OnceCell::new(),
            lifecycle,
            fatal,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("logged in as {}", ready.user.name);

        if !self.lifecycle.begin_loading() {
            debug!("ready event after reconnect, commands already loaded");
            return;
        }

        if let Some(activity) = &self.activity {
            ctx.set_activity(Some(activity.clone()));
        }

        let registrar = GuildRegistrar::new(Arc::clone(&ctx.http), self.guild_id);
        match self.commander.prepare(&registrar).await {
            Ok(dispatcher) => {
                info!(
                    "listening for {} commands ({} with a handler)",
                    dispatcher.schemas().len(),
                    dispatcher.registry().len()
                );
                if self.dispatcher.set(dispatcher).is_err() {
                    warn!("command dispatcher was already set");
                }
                self.lifecycle.listening();
            }
            Err(e) => {
                error!("failed to load commands: {:#}", e);
                if self.fatal.send(e).is_err() {
                    error!("bot is no longer running, shutting down shard");
                    ctx.shard.shutdown_clean();
                }
            }
        }
    }

    /// Called for every interaction; only slash commands are handled
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let invocation = invocation_from(&command);
        let responder = InteractionResponder::new(&ctx, &command);

        let Some(dispatcher) = self.dispatcher.get() else {
            Dispatcher::reply_no_handler(&invocation.name, &responder).await;
            return;
        };

        if let DispatchOutcome::Failed(e) = dispatcher.dispatch(&invocation, &responder).await {
            debug!("/{} ended with an error: {}", invocation.name, e);
        }
    }
}
