//! Declarative slash command schemas.
//!
//! A [`CommandSchema`] describes the public surface of one command: the name
//! users type after `/`, a human readable description and the structured
//! options Discord should prompt for. Schemas are read from command manifests
//! at load time and converted into serenity [`CreateCommand`] builders for the
//! bulk registration call.
//!
//! Names and descriptions are not re-validated here; Discord rejects the whole
//! registration payload if one of them breaks its naming rules.

use serde::{Deserialize, Serialize};
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

/// Public surface of a single slash command.
///
/// # Examples
///
/// ```yaml
/// name: echo
/// description: Repeat a message
/// options:
///   - name: text
///     description: What to repeat
///     type: string
///     required: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandSchema {
    /// Command name, unique across the loaded manifests
    pub name: String,
    /// Description shown by the Discord client
    pub description: String,
    /// Structured arguments, in display order
    #[serde(default)]
    pub options: Vec<CommandOptionSchema>,
}

/// One structured argument of a slash command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandOptionSchema {
    /// Option name
    pub name: String,
    /// Option description
    pub description: String,
    /// Value type Discord should collect
    #[serde(rename = "type")]
    pub kind: OptionKind,
    /// Whether the user must provide the option
    #[serde(default)]
    pub required: bool,
}

/// Value types supported for command options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
}

impl OptionKind {
    fn to_serenity(self) -> CommandOptionType {
        match self {
            OptionKind::String => CommandOptionType::String,
            OptionKind::Integer => CommandOptionType::Integer,
            OptionKind::Number => CommandOptionType::Number,
            OptionKind::Boolean => CommandOptionType::Boolean,
            OptionKind::User => CommandOptionType::User,
            OptionKind::Channel => CommandOptionType::Channel,
            OptionKind::Role => CommandOptionType::Role,
        }
    }
}

impl CommandSchema {
    /// Builds the serenity registration builder for this schema.
    ///
    /// The resulting [`CreateCommand`] is what gets serialized into the bulk
    /// overwrite payload.
    pub fn to_create_command(&self) -> CreateCommand {
        self.options.iter().fold(
            CreateCommand::new(&self.name).description(&self.description),
            |command, option| command.add_option(option.to_create_option()),
        )
    }
}

impl CommandOptionSchema {
    fn to_create_option(&self) -> CreateCommandOption {
        CreateCommandOption::new(self.kind.to_serenity(), &self.name, &self.description)
            .required(self.required)
    }
}
