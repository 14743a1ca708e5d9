//! Echo command handler.
//!
//! Repeats the `text` option back to the user. With `private: true` the reply
//! is ephemeral.

use async_trait::async_trait;
use log::debug;

use crate::commands::{CommandContext, CommandError, CommandHandler, Reply};

/// Repeats the `text` option.
///
/// Fails with [`CommandError::InvalidOption`] when `text` is missing, which
/// only happens if the manifest forgot to mark it as required.
pub struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        let text = ctx
            .invocation
            .string_option("text")
            .ok_or_else(|| CommandError::InvalidOption("text".to_string()))?;
        let private = ctx.invocation.bool_option("private").unwrap_or(false);

        debug!("handling echo command, private: {}", private);

        let reply = Reply::text(text);
        let reply = if private { reply.ephemeral() } else { reply };
        ctx.responder.reply(reply).await
    }
}
