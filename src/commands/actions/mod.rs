//! Command handlers compiled into the binary.
//!
//! A manifest binds one of these handlers through its `run` key. Only the
//! handlers listed in [`builtin_handlers`] can ever be invoked, whatever the
//! commands directory contains.
//!
//! # Available Handlers
//!
//! | Key | Handler | Behavior |
//! |-----|---------|----------|
//! | `test` | [`TestCommand`] | Replies "Works" |
//! | `echo` | [`EchoCommand`] | Repeats its `text` option |
//! | `help` | [`HelpCommand`] | Lists the registered commands |

use std::sync::Arc;

use crate::commands::HandlerTable;

mod echo;
mod help;

pub use crate::commands::actions::{echo::EchoCommand, help::HelpCommand, test::TestCommand};

/// Returns the handler table used to bind manifests to code.
pub fn builtin_handlers() -> HandlerTable {
    let mut handlers = HandlerTable::new();
    handlers.insert("test", Arc::new(TestCommand) as _);
    handlers.insert("echo", Arc::new(EchoCommand) as _);
    handlers.insert("help", Arc::new(HelpCommand) as _);
    handlers
}
