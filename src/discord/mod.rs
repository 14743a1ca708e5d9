//! Discord integration through serenity.
//!
//! This module adapts the gateway and HTTP client of serenity to the command
//! pipeline of [`crate::commands`]:
//!
//! - **Handler**: the serenity event handler running the startup sequence on
//!   the first `ready` event and dispatching slash command interactions
//! - **Registrar**: bulk overwrite of the guild commands
//! - **Responder**: interaction responses built from [`Reply`](crate::commands::Reply) values
//! - **Presence**: presence type codes mapped to serenity activities
//!
//! The gateway protocol, authentication and rate limiting all stay inside
//! serenity.

mod handler;
mod presence;
mod registrar;
mod responder;

pub use crate::discord::{
    handler::Handler,
    presence::PresenceKind,
    registrar::GuildRegistrar,
    responder::{InteractionResponder, invocation_from},
};
