use std::time::Duration;

use herald::ElectionTimer;
use rand::Rng;

/// Draws the watchdog delay uniformly from a millisecond range, bounds
/// included. Peers with different draws avoid campaigning in lockstep.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RandomizedElectionTimer {
    range_start_ms: u64,
    range_stop_ms: u64,
}

impl RandomizedElectionTimer {
    pub fn new(range_start_ms: u64, range_stop_ms: u64) -> RandomizedElectionTimer {
        if range_start_ms > range_stop_ms || range_stop_ms == 0 {
            panic!(
                "Invalid params: range_start_ms : {}, range_stop_ms : {}",
                range_start_ms, range_stop_ms
            )
        }
        RandomizedElectionTimer {
            range_start_ms,
            range_stop_ms,
        }
    }
}

impl ElectionTimer for RandomizedElectionTimer {
    fn next_election_timeout(&self) -> Duration {
        let mut rng = rand::thread_rng();

        Duration::from_millis(rng.gen_range(self.range_start_ms..=self.range_stop_ms))
    }
}

/// Production watchdog range: 2000 to 3000 ms.
impl Default for RandomizedElectionTimer {
    fn default() -> RandomizedElectionTimer {
        RandomizedElectionTimer::new(2000, 3000)
    }
}
