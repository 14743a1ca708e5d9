//! Help command handler.
//!
//! Lists every registered command with its description. The reply is
//! ephemeral so asking for help does not clutter the channel.

use async_trait::async_trait;
use log::debug;

use crate::commands::{
    CommandContext, CommandError, CommandHandler, Reply, response::format_help,
};

/// Replies with an embed listing the registered commands.
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        debug!("handling help command");

        ctx.responder
            .reply(Reply::embed(format_help(ctx.commands)).ephemeral())
            .await
    }
}
