//! Fixed reply texts.
//!
//! Every user-facing string the bot produces on its own (as opposed to the
//! handlers' replies) is formatted here so the wording lives in one place.

use crate::commands::{CommandError, CommandSchema, ReplyEmbed};

/// Notice sent when an invoked command has no registered handler.
///
/// # Examples
///
/// ```
/// # use herald::commands::response::format_no_handler;
/// assert_eq!(format_no_handler("ping"), "No command handler found for /ping.");
/// ```
pub fn format_no_handler(command_name: &str) -> String {
    format!("No command handler found for /{command_name}.")
}

/// Details sent to the invoking user when a handler fails in debug mode.
pub fn format_handler_error(command_name: &str, error: &CommandError) -> String {
    format!("Error executing /{command_name}: {error}")
}

/// Embed listing the registered commands, in registration order.
pub fn format_help(commands: &[CommandSchema]) -> ReplyEmbed {
    if commands.is_empty() {
        return ReplyEmbed {
            title: Some("Commands".to_string()),
            description: Some("No commands are registered.".to_string()),
            fields: Vec::new(),
        };
    }

    ReplyEmbed {
        title: Some("Commands".to_string()),
        description: None,
        fields: commands
            .iter()
            .map(|schema| (format!("/{}", schema.name), schema.description.clone()))
            .collect(),
    }
}
