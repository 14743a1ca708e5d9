//! Herald - A Discord slash command bot scaffold.
//!
//! This is the main entry point of the Herald bot, which logs in to Discord,
//! registers the slash commands described in a directory of manifests and
//! answers their invocations.
//!
//! # Overview
//!
//! Herald separates what a command looks like from what it does:
//!
//! - **Manifests**: YAML files in the commands directory declare each
//!   command's name, description and options
//! - **Handlers**: the behavior is compiled into the binary; a manifest picks
//!   one with its `run` key
//!
//! On the first gateway `ready` event, the bot loads every manifest, replaces
//! the guild's slash commands with the loaded ones in a single call, then
//! dispatches every slash command interaction to its handler.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! discord:
//!   token: "bot-token"
//!   application_id: 123456789012345678
//!   guild_id: 876543210987654321
//! commands:
//!   directory: "commands"
//! presence:
//!   text: "with slash commands"
//!   kind: 0
//! ```
//!
//! Any value can be overridden with a `HERALD_` environment variable, e.g.
//! `HERALD_DISCORD__TOKEN`.
//!
//! # Usage
//!
//! ```bash
//! herald --config config.yaml
//! herald --config config.yaml --debug
//! ```
//!
//! # Command Manifests
//!
//! ```yaml
//! # commands/test.yaml
//! name: test
//! description: test command
//! run: test
//! ```
//!
//! # Architecture
//!
//! - [`bot`] - Client wrapper driving the lifecycle
//! - [`commands`] - Manifest loading, registration and dispatch
//! - [`config`] - YAML configuration with environment overrides
//! - [`discord`] - Serenity event handler, registrar and responder
//! - [`lifecycle`] - Bot phases
//! - [`utils`] - Path helpers
//!
//! # Exit Status
//!
//! The process exits with status 1 when the configuration is invalid or the
//! startup sequence fails (missing commands directory, invalid manifest,
//! duplicate command, failed registration).
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod discord;
mod lifecycle;
mod utils;

/// Command-line arguments for the Herald bot.
///
/// # Examples
///
/// ```bash
/// herald --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Environment variables prefixed with `HERALD_` override file values,
    /// nested keys being separated by `__`:
    ///
    /// ```bash
    /// export HERALD_DISCORD__TOKEN="secret-from-env"
    /// herald --config config.yaml
    /// ```
    #[arg(short, long)]
    config: String,

    /// Enable debug mode, whatever the configuration says.
    ///
    /// Handler errors are then shown to the user who invoked the command.
    #[arg(short, long)]
    debug: bool,
}

/// Main entry point for the Herald bot.
///
/// 1. **Logging Setup**: `info` level by default, overridable with `RUST_LOG`
/// 2. **Argument Parsing**: with `clap`
/// 3. **Configuration Loading**: YAML file merged with `HERALD_` variables
/// 4. **Bot Execution**: builds the client and runs until the session ends
#[tokio::main]
async fn main() -> ExitCode {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("starting herald {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load config file: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    config.debug |= args.debug;

    let bot = match Bot::new(config).await {
        Ok(b) => b,
        Err(e) => {
            error!("failed to initialize bot: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = bot.start().await {
        error!("bot stopped: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
