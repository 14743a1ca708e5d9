//! In-memory map from command name to handler.

use std::{collections::HashMap, sync::Arc};

use crate::commands::CommandHandler;

/// Handlers of the loaded commands, keyed by command name.
///
/// The registry is filled once by the [`CommandLoader`](crate::commands::CommandLoader)
/// and then moved into a [`Dispatcher`](crate::commands::Dispatcher), which only
/// reads from it. Nothing is ever removed.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Registers `handler` under `name`, returning the handler it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.insert(name.into(), handler)
    }

    /// Looks up the handler registered for `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::actions::TestCommand;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = CommandRegistry::default();

        assert!(registry.is_empty());
        assert!(registry.get("test").is_none());
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry = CommandRegistry::default();
        assert!(registry.insert("test", Arc::new(TestCommand)).is_none());

        assert!(registry.contains("test"));
        assert!(registry.get("test").is_some());
        assert!(!registry.contains("other"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_same_name_returns_previous_handler() {
        let mut registry = CommandRegistry::default();
        registry.insert("test", Arc::new(TestCommand));

        assert!(registry.insert("test", Arc::new(TestCommand)).is_some());
        assert_eq!(registry.len(), 1);
    }
}
