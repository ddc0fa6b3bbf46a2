use std::time::Duration;

use herald::ElectionTimer;

/// Constant watchdog delay, useful for deterministic tests.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FixedElectionTimer {
    fixed_duration_ms: u64,
}

impl FixedElectionTimer {
    pub fn new(fixed_duration_ms: u64) -> FixedElectionTimer {
        FixedElectionTimer { fixed_duration_ms }
    }
}

impl ElectionTimer for FixedElectionTimer {
    fn next_election_timeout(&self) -> Duration {
        Duration::from_millis(self.fixed_duration_ms)
    }
}
