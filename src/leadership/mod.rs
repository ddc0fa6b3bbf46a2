use std::time::Duration;

pub mod heartbeat;
pub mod resolution;
pub mod watchdog;

/// Commands the engine sends to the candidacy resolution worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionCommand {
    /// Starts the one-shot resolution countdown for the given candidacy
    /// round. A later command replaces any countdown still pending.
    Arm(u64),
    /// Disarms a pending countdown.
    Cancel,
}

/// Source of the delay between election watchdog firings. A fresh value is
/// drawn before every wait so peers stay desynchronized.
pub trait ElectionTimer: Send + 'static {
    fn next_election_timeout(&self) -> Duration;
}
