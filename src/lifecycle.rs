//! Bot lifecycle phases.
//!
//! ```text
//! Disconnected → Connecting → Loading → Listening
//! ```
//!
//! Each transition happens at most once per process. In particular, a
//! reconnect delivers another `ready` event but cannot move the bot back to
//! [`Phase::Loading`]: commands are loaded exactly once.

use log::info;
use tokio::sync::watch;

/// Phase of the bot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built but not started
    Disconnected,
    /// Logging in and opening the gateway
    Connecting,
    /// Loading and registering commands
    Loading,
    /// Dispatching interactions
    Listening,
}

/// Shared, monotonic lifecycle state.
pub struct Lifecycle {
    phase: watch::Sender<Phase>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(Phase::Disconnected);
        Lifecycle { phase }
    }

    pub fn current(&self) -> Phase {
        *self.phase.borrow()
    }

    /// `Disconnected → Connecting`
    pub fn connecting(&self) -> bool {
        self.advance(Phase::Disconnected, Phase::Connecting)
    }

    /// `Connecting → Loading`; `false` if loading already started.
    pub fn begin_loading(&self) -> bool {
        self.advance(Phase::Connecting, Phase::Loading)
    }

    /// `Loading → Listening`
    pub fn listening(&self) -> bool {
        self.advance(Phase::Loading, Phase::Listening)
    }

    fn advance(&self, from: Phase, to: Phase) -> bool {
        self.phase.send_if_modified(|phase| {
            if *phase != from {
                return false;
            }
            info!("bot phase: {:?} -> {:?}", from, to);
            *phase = to;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.current(), Phase::Disconnected);

        assert!(lifecycle.connecting());
        assert_eq!(lifecycle.current(), Phase::Connecting);

        assert!(lifecycle.begin_loading());
        assert_eq!(lifecycle.current(), Phase::Loading);

        assert!(lifecycle.listening());
        assert_eq!(lifecycle.current(), Phase::Listening);
    }

    #[test]
    fn test_loading_happens_once() {
        let lifecycle = Lifecycle::new();
        lifecycle.connecting();

        assert!(lifecycle.begin_loading());
        assert!(!lifecycle.begin_loading());

        lifecycle.listening();
        // A reconnect's ready event must not reload
        assert!(!lifecycle.begin_loading());
        assert_eq!(lifecycle.current(), Phase::Listening);
    }

    #[test]
    fn test_phases_cannot_be_skipped() {
        let lifecycle = Lifecycle::new();

        assert!(!lifecycle.begin_loading());
        assert!(!lifecycle.listening());
        assert_eq!(lifecycle.current(), Phase::Disconnected);
    }
}
