//! Interaction responses.
//!
//! Converts serenity slash command interactions into [`Invocation`] values and
//! sends [`Reply`] values back as interaction responses.

use async_trait::async_trait;
use serenity::all::{
    CommandDataOptionValue, CommandInteraction, Context, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};

use crate::commands::{CommandError, Invocation, OptionValue, Reply, ReplyEmbed, Responder};

/// Reply capability of one live slash command interaction.
pub struct InteractionResponder<'a> {
    ctx: &'a Context,
    interaction: &'a CommandInteraction,
}

impl<'a> InteractionResponder<'a> {
    pub fn new(ctx: &'a Context, interaction: &'a CommandInteraction) -> Self {
        InteractionResponder { ctx, interaction }
    }
}

#[async_trait]
impl Responder for InteractionResponder<'_> {
    async fn reply(&self, reply: Reply) -> Result<(), CommandError> {
        self.interaction
            .create_response(
                self.ctx,
                CreateInteractionResponse::Message(build_message(reply)),
            )
            .await
            .map_err(CommandError::Reply)
    }
}

/// Extracts the invocation carried by a slash command interaction.
///
/// Only top-level options with a plain value are kept; subcommands,
/// attachments and autocomplete payloads are not part of the command contract.
pub fn invocation_from(interaction: &CommandInteraction) -> Invocation {
    Invocation {
        name: interaction.data.name.clone(),
        user_id: interaction.user.id.get(),
        options: interaction
            .data
            .options
            .iter()
            .filter_map(|option| {
                option_value(&option.value).map(|value| (option.name.clone(), value))
            })
            .collect(),
    }
}

fn option_value(value: &CommandDataOptionValue) -> Option<OptionValue> {
    match value {
        CommandDataOptionValue::String(value) => Some(OptionValue::String(value.clone())),
        CommandDataOptionValue::Integer(value) => Some(OptionValue::Integer(*value)),
        CommandDataOptionValue::Number(value) => Some(OptionValue::Number(*value)),
        CommandDataOptionValue::Boolean(value) => Some(OptionValue::Boolean(*value)),
        CommandDataOptionValue::User(id) => Some(OptionValue::User(id.get())),
        CommandDataOptionValue::Channel(id) => Some(OptionValue::Channel(id.get())),
        CommandDataOptionValue::Role(id) => Some(OptionValue::Role(id.get())),
        _ => None,
    }
}

fn build_message(reply: Reply) -> CreateInteractionResponseMessage {
    let mut message = CreateInteractionResponseMessage::new().ephemeral(reply.ephemeral);
    if let Some(content) = reply.content {
        message = message.content(content);
    }
    if !reply.embeds.is_empty() {
        message = message.embeds(reply.embeds.into_iter().map(build_embed).collect());
    }
    message
}

fn build_embed(embed: ReplyEmbed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = embed.description {
        builder = builder.description(description);
    }
    embed
        .fields
        .into_iter()
        .fold(builder, |builder, (name, value)| builder.field(name, value, false))
}
