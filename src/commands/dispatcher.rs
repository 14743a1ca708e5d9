//! Interaction dispatch.
//!
//! The [`Dispatcher`] owns the registry built at load time and routes each
//! [`Invocation`] to its handler. Handler failures never escape a dispatch:
//! they are reported through the [`ErrorPolicy`] and returned as a
//! [`DispatchOutcome`] for the caller to inspect.

use log::{debug, error, warn};

use crate::commands::{
    CommandContext, CommandError, CommandRegistry, CommandSchema, Invocation, Reply, Responder,
    response::{format_handler_error, format_no_handler},
};

/// How handler failures are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the error and send nothing else (production)
    #[default]
    Quiet,
    /// Log the full error chain and show it to the invoking user (debug)
    Verbose,
}

impl ErrorPolicy {
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            ErrorPolicy::Verbose
        } else {
            ErrorPolicy::Quiet
        }
    }

    async fn report(self, command_name: &str, error: &CommandError, responder: &dyn Responder) {
        match self {
            ErrorPolicy::Quiet => error!("error executing /{}: {}", command_name, error),
            ErrorPolicy::Verbose => {
                error!("error executing /{}: {:?}", command_name, error);

                let reply = Reply::text(format_handler_error(command_name, error)).ephemeral();
                if let Err(e) = responder.reply(reply).await {
                    warn!("failed to report error of /{}: {}", command_name, e);
                }
            }
        }
    }
}

/// What happened to one invocation.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler ran and succeeded
    Handled,
    /// No handler is registered under the invoked name
    NoHandler,
    /// The handler ran and failed
    Failed(CommandError),
}

/// Routes invocations to the handlers of the loaded commands.
///
/// Built once the startup sequence has loaded and registered the commands;
/// read-only afterwards, so it can be shared between concurrent dispatches.
pub struct Dispatcher {
    /// Handlers keyed by command name
    registry: CommandRegistry,
    /// Registered schemas, exposed to handlers such as `help`
    schemas: Vec<CommandSchema>,
    /// Reporting of handler failures
    policy: ErrorPolicy,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, schemas: Vec<CommandSchema>, policy: ErrorPolicy) -> Self {
        Dispatcher {
            registry,
            schemas,
            policy,
        }
    }

    /// Dispatcher with no command, used when nothing was loaded.
    pub fn empty(policy: ErrorPolicy) -> Self {
        Dispatcher::new(CommandRegistry::default(), Vec::new(), policy)
    }

    pub fn schemas(&self) -> &[CommandSchema] {
        &self.schemas
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Runs the handler registered for `invocation`.
    ///
    /// # Behavior
    ///
    /// - Handler found: it is called exactly once. On failure the error is
    ///   reported through the [`ErrorPolicy`]; nothing is retried.
    /// - No handler: the user gets the ephemeral "no handler found" notice.
    pub async fn dispatch(
        &self,
        invocation: &Invocation,
        responder: &dyn Responder,
    ) -> DispatchOutcome {
        let Some(handler) = self.registry.get(&invocation.name) else {
            Self::reply_no_handler(&invocation.name, responder).await;
            return DispatchOutcome::NoHandler;
        };

        debug!(
            "dispatching /{} for user {}",
            invocation.name, invocation.user_id
        );

        let ctx = CommandContext {
            invocation,
            responder,
            commands: &self.schemas,
        };

        match handler.run(&ctx).await {
            Ok(()) => DispatchOutcome::Handled,
            Err(e) => {
                self.policy.report(&invocation.name, &e, responder).await;
                DispatchOutcome::Failed(e)
            }
        }
    }

    /// Tells the invoking user that `command_name` has no handler.
    pub async fn reply_no_handler(command_name: &str, responder: &dyn Responder) {
        debug!("no handler registered for /{}", command_name);

        let reply = Reply::text(format_no_handler(command_name)).ephemeral();
        if let Err(e) = responder.reply(reply).await {
            warn!("failed to answer /{}: {}", command_name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::commands::{CommandHandler, MockResponder, actions::TestCommand};

    struct CountingCommand {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler for CountingCommand {
        async fn run(&self, _ctx: &CommandContext<'_>) -> Result<(), CommandError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl CommandHandler for FailingCommand {
        async fn run(&self, _ctx: &CommandContext<'_>) -> Result<(), CommandError> {
            Err(CommandError::Other(anyhow::anyhow!("boom")))
        }
    }

    fn create_invocation(name: &str) -> Invocation {
        Invocation {
            name: name.to_string(),
            user_id: 1,
            options: Vec::new(),
        }
    }

    fn create_dispatcher(policy: ErrorPolicy) -> (Dispatcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = CommandRegistry::default();
        registry.insert("test", Arc::new(TestCommand));
        registry.insert(
            "count",
            Arc::new(CountingCommand {
                calls: Arc::clone(&calls),
            }),
        );
        registry.insert("boom", Arc::new(FailingCommand));

        (Dispatcher::new(registry, Vec::new(), policy), calls)
    }

    #[test]
    fn test_error_policy_from_debug() {
        assert_eq!(ErrorPolicy::from_debug(false), ErrorPolicy::Quiet);
        assert_eq!(ErrorPolicy::from_debug(true), ErrorPolicy::Verbose);
    }

    #[tokio::test]
    async fn test_dispatch_to_handler() {
        let (dispatcher, _) = create_dispatcher(ErrorPolicy::Quiet);
        let mut responder = MockResponder::new();
        responder
            .expect_reply()
            .withf(|reply| reply.content.as_deref() == Some("Works"))
            .times(1)
            .returning(|_| Ok(()));

        let outcome = dispatcher
            .dispatch(&create_invocation("test"), &responder)
            .await;

        assert!(matches!(outcome, DispatchOutcome::Handled));
    }

    #[tokio::test]
    async fn test_dispatch_calls_handler_exactly_once() {
        let (dispatcher, calls) = create_dispatcher(ErrorPolicy::Quiet);
        let mut responder = MockResponder::new();
        responder.expect_reply().never();

        dispatcher
            .dispatch(&create_invocation("count"), &responder)
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let (dispatcher, calls) = create_dispatcher(ErrorPolicy::Quiet);
        let mut responder = MockResponder::new();
        responder
            .expect_reply()
            .withf(|reply| {
                reply.ephemeral
                    && reply.content.as_deref() == Some("No command handler found for /missing.")
                    && reply.embeds.is_empty()
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = dispatcher
            .dispatch(&create_invocation("missing"), &responder)
            .await;

        assert!(matches!(outcome, DispatchOutcome::NoHandler));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_failure_quiet_sends_nothing() {
        let (dispatcher, _) = create_dispatcher(ErrorPolicy::Quiet);
        let mut responder = MockResponder::new();
        responder.expect_reply().never();

        let outcome = dispatcher
            .dispatch(&create_invocation("boom"), &responder)
            .await;

        assert!(matches!(outcome, DispatchOutcome::Failed(CommandError::Other(_))));
    }

    #[tokio::test]
    async fn test_dispatch_failure_verbose_reports_to_user() {
        let (dispatcher, _) = create_dispatcher(ErrorPolicy::Verbose);
        let mut responder = MockResponder::new();
        responder
            .expect_reply()
            .withf(|reply| {
                reply.ephemeral && reply.content.as_deref() == Some("Error executing /boom: boom")
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = dispatcher
            .dispatch(&create_invocation("boom"), &responder)
            .await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command_survives_reply_failure() {
        let dispatcher = Dispatcher::empty(ErrorPolicy::Quiet);
        let mut responder = MockResponder::new();
        responder
            .expect_reply()
            .times(1)
            .returning(|_| Err(CommandError::Other(anyhow::anyhow!("unknown interaction"))));

        let outcome = dispatcher
            .dispatch(&create_invocation("test"), &responder)
            .await;

        assert!(matches!(outcome, DispatchOutcome::NoHandler));
    }

    #[tokio::test]
    async fn test_dispatch_exposes_schemas_to_handlers() {
        let schemas = vec![CommandSchema {
            name: "help".to_string(),
            description: "List commands".to_string(),
            options: Vec::new(),
        }];
        let mut registry = CommandRegistry::default();
        registry.insert("help", Arc::new(crate::commands::actions::HelpCommand));
        let dispatcher = Dispatcher::new(registry, schemas, ErrorPolicy::Quiet);

        let mut responder = MockResponder::new();
        responder
            .expect_reply()
            .withf(|reply| reply.embeds.len() == 1 && reply.embeds[0].fields[0].0 == "/help")
            .times(1)
            .returning(|_| Ok(()));

        let outcome = dispatcher
            .dispatch(&create_invocation("help"), &responder)
            .await;

        assert!(matches!(outcome, DispatchOutcome::Handled));
        assert_eq!(dispatcher.schemas().len(), 1);
    }
}
