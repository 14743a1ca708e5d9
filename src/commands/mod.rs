//! Slash command loading, registration and dispatch.
//!
//! This module provides the whole command pipeline of the bot, from the
//! manifest files on disk to the handler that answers an interaction.
//!
//! # Overview
//!
//! 1. **Loading** - [`CommandLoader`] scans the commands directory for YAML
//!    manifests, collecting one [`CommandSchema`] per manifest and binding the
//!    compiled-in handler the manifest names
//! 2. **Registration** - [`Commander`] pushes the collected schemas to Discord
//!    in one bulk overwrite call through a [`CommandRegistrar`]
//! 3. **Dispatch** - [`Dispatcher`] looks up the invoked command in its
//!    [`CommandRegistry`] and runs the handler, applying the configured
//!    [`ErrorPolicy`] when the handler fails
//!
//! # Architecture
//!
//! ```text
//! commands/*.yaml
//!      │
//!      ▼
//! ┌───────────────┐      ┌──────────────────┐
//! │ CommandLoader │ ───▶ │ schemas+registry │
//! └───────────────┘      └──────────────────┘
//!                            │          │
//!                            ▼          ▼
//!                  ┌───────────────┐  ┌────────────┐
//!                  │ registrar     │  │ Dispatcher │ ◀── Invocation
//!                  │ (bulk PUT)    │  └────────────┘
//!                  └───────────────┘        │
//!                                           ▼
//!                                   CommandHandler::run
//!                                           │
//!                                           ▼
//!                                   Responder::reply
//! ```
//!
//! # Module Organization
//!
//! - [`actions`] - Handlers compiled into the binary
//! - [`commander`] - Load-then-register startup sequence
//! - [`dispatcher`] - Handler lookup and error policy
//! - [`loader`] - Manifest discovery and parsing
//! - [`registry`] - Name to handler map
//! - [`response`] - Fixed reply texts
//! - [`schema`] - Declarative command schemas

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod actions;
mod commander;
mod dispatcher;
mod loader;
mod registry;
mod response;
mod schema;

pub use crate::commands::{
    commander::{CommandRegistrar, Commander},
    dispatcher::{DispatchOutcome, Dispatcher, ErrorPolicy},
    loader::{CommandLoader, HandlerTable, LoadError, LoadOutcome, LoadedCommands},
    registry::CommandRegistry,
    schema::{CommandOptionSchema, CommandSchema, OptionKind},
};

#[cfg(test)]
pub use crate::commands::commander::MockCommandRegistrar;

/// One slash command invocation, decoupled from the gateway event it came from.
///
/// # Examples
///
/// ```
/// # use herald::commands::{Invocation, OptionValue};
/// let invocation = Invocation {
///     name: "echo".to_string(),
///     user_id: 42,
///     options: vec![("text".to_string(), OptionValue::String("hi".to_string()))],
/// };
/// assert_eq!(invocation.string_option("text"), Some("hi"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Name of the invoked command
    pub name: String,
    /// Discord id of the invoking user
    pub user_id: u64,
    /// Top-level options, in the order Discord sent them
    pub options: Vec<(String, OptionValue)>,
}

/// Resolved value of a command option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(u64),
    Channel(u64),
    Role(u64),
}

impl Invocation {
    /// Returns the value of the option called `name`, if the user provided it.
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|(option_name, _)| option_name == name)
            .map(|(_, value)| value)
    }

    pub fn string_option(&self, name: &str) -> Option<&str> {
        match self.option(name) {
            Some(OptionValue::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn bool_option(&self, name: &str) -> Option<bool> {
        match self.option(name) {
            Some(OptionValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Message sent back to the invoking user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    /// Plain text body
    pub content: Option<String>,
    /// Rich embeds shown below the text
    pub embeds: Vec<ReplyEmbed>,
    /// Only the invoking user sees an ephemeral reply
    pub ephemeral: bool,
}

/// Minimal embed description, converted to a Discord embed when sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyEmbed {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `(name, value)` pairs rendered as embed fields
    pub fields: Vec<(String, String)>,
}

impl Reply {
    /// Creates a public plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Reply {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Creates a public reply holding a single embed.
    pub fn embed(embed: ReplyEmbed) -> Self {
        Reply {
            embeds: vec![embed],
            ..Default::default()
        }
    }

    /// Marks the reply as visible only to the invoking user.
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

/// Errors a command handler can return to the dispatcher.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required option was not provided or had the wrong type
    #[error("missing or invalid option `{0}`")]
    InvalidOption(String),
    /// Discord refused the interaction response
    #[error("failed to send interaction response")]
    Reply(#[source] serenity::Error),
    /// Any other handler failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Reply capability of an interaction.
///
/// Implemented over serenity for live interactions, and mocked in tests.
#[automock]
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends `reply` as the response to the interaction.
    async fn reply(&self, reply: Reply) -> Result<(), CommandError>;
}

/// Everything a handler gets to work with for one invocation.
pub struct CommandContext<'a> {
    /// The invocation being handled
    pub invocation: &'a Invocation,
    /// Reply capability of the interaction
    pub responder: &'a dyn Responder,
    /// Schemas of every registered command, in registration order
    pub commands: &'a [CommandSchema],
}

/// Behavior of one slash command.
///
/// A handler is called at most once per invocation. It answers through
/// [`CommandContext::responder`] and reports failures by returning an error,
/// which the [`Dispatcher`] hands to its [`ErrorPolicy`].
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError>;
}
