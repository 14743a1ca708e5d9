//! Guild command registration.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serenity::all::{CreateCommand, GuildId, Http};

use crate::commands::{CommandRegistrar, CommandSchema};

/// Registers commands on one guild of the configured application.
///
/// Uses Discord's bulk overwrite endpoint
/// (`PUT /applications/{application}/guilds/{guild}/commands`): the guild ends
/// up with exactly the given commands. The application id comes from the
/// [`Http`] client, which the bot builds with the configured id.
pub struct GuildRegistrar {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl GuildRegistrar {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        GuildRegistrar { http, guild_id }
    }
}

#[async_trait]
impl CommandRegistrar for GuildRegistrar {
    async fn register(&self, schemas: &[CommandSchema]) -> anyhow::Result<usize> {
        let commands: Vec<CreateCommand> =
            schemas.iter().map(CommandSchema::to_create_command).collect();

        debug!(
            "registration payload for guild {}: {}",
            self.guild_id,
            serde_json::to_string(&commands)?
        );

        let registered = self.guild_id.set_commands(&self.http, commands).await?;

        Ok(registered.len())
    }
}
