//! Configuration file structures for the Herald bot.
//!
//! The configuration is a YAML file, merged with environment variables
//! prefixed by `HERALD_` (nested keys separated by `__`).
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Discord application settings
//! discord:
//!   # Bot token from the Discord developer portal
//!   token: "bot-token"
//!   # Application (client) id
//!   application_id: 123456789012345678
//!   # Guild the slash commands are registered on
//!   guild_id: 876543210987654321
//!
//! # Command manifests
//! commands:
//!   # Relative to the working directory
//!   directory: "commands"
//!
//! # Optional presence
//! presence:
//!   text: "with slash commands"
//!   # 0 playing, 1 streaming, 2 listening, 3 watching, 4 custom, 5 competing
//!   kind: 0
//!
//! # Show handler errors to users
//! debug: false
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export HERALD_DISCORD__TOKEN="bot-token"
//! export HERALD_DISCORD__GUILD_ID="876543210987654321"
//! export HERALD_DEBUG=true
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;
use thiserror::Error;

use crate::discord::PresenceKind;

/// Prefix of the environment variables merged over the file.
const ENV_PREFIX: &str = "HERALD_";

/// Root configuration structure for the Herald bot.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Discord application configuration
    pub discord: Discord,
    /// Command manifest configuration
    #[serde(default)]
    pub commands: Commands,
    /// Activity shown next to the bot name
    #[serde(default)]
    pub presence: Option<Presence>,
    /// Debug mode: handler errors are shown to the invoking user
    #[serde(default)]
    pub debug: bool,
}

/// Discord application configuration.
#[derive(Debug, Deserialize)]
pub struct Discord {
    /// Bot token.
    ///
    /// This is a secret; prefer `HERALD_DISCORD__TOKEN` over the file.
    pub token: String,

    /// Application id the commands belong to.
    pub application_id: u64,

    /// Guild id the commands are registered on.
    ///
    /// Guild commands are available immediately, unlike global commands.
    pub guild_id: u64,
}

/// Command manifest configuration.
#[derive(Debug, Deserialize)]
pub struct Commands {
    /// Directory scanned for command manifests, relative to the working
    /// directory.
    #[serde(default = "default_commands_directory")]
    pub directory: String,
}

impl Default for Commands {
    fn default() -> Self {
        Commands {
            directory: default_commands_directory(),
        }
    }
}

fn default_commands_directory() -> String {
    "commands".to_string()
}

/// Presence configuration.
#[derive(Debug, Deserialize)]
pub struct Presence {
    /// Activity text
    pub text: String,
    /// Discord activity type code, see [`PresenceKind::from_code`]
    #[serde(default)]
    pub kind: u8,
    /// Stream url, only used by the streaming kind
    pub url: Option<String>,
}

/// Semantic configuration errors, found after parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("discord.token must not be empty")]
    EmptyToken,
    #[error("discord.{0} must be a non-zero id")]
    InvalidId(&'static str),
    #[error("presence.kind {0} is not a supported activity type")]
    InvalidPresenceKind(u8),
}

impl Config {
    /// Loads the configuration from `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a required
    /// key is missing, or if [`Config::validate`] rejects the values.
    pub fn load(path: &str) -> Result<Self, anyhow::Error> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;

        Ok(config)
    }

    /// Checks the values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        if self.discord.application_id == 0 {
            return Err(ConfigError::InvalidId("application_id"));
        }
        if self.discord.guild_id == 0 {
            return Err(ConfigError::InvalidId("guild_id"));
        }
        if let Some(presence) = &self.presence
            && PresenceKind::from_code(presence.kind).is_none()
        {
            return Err(ConfigError::InvalidPresenceKind(presence.kind));
        }

        Ok(())
    }
}
