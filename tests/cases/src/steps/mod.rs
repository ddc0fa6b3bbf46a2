use std::thread;
use std::time::{Duration, Instant};

use herald::{NodeConfiguration, PeerHandle, PeerId, PeerTimings};
use herald_modules::{InProcBroadcastBus, RandomizedElectionTimer};

pub mod cluster;

pub fn sleep_ms(milliseconds: u64) {
    thread::sleep(Duration::from_millis(milliseconds));
}

/// Protocol delays scaled down to a fifth of the production defaults so the
/// cases finish quickly.
pub fn case_timings() -> PeerTimings {
    PeerTimings {
        heartbeat_interval: Duration::from_millis(100),
        staleness_multiplier: 3,
        resolution_timeout: Duration::from_millis(600),
    }
}

pub fn start_case_peer(bus: &InProcBroadcastBus, id: &str) -> PeerHandle<InProcBroadcastBus> {
    herald::start_peer(NodeConfiguration {
        peer_id: PeerId::from(id),
        bus: bus.clone(),
        election_timer: RandomizedElectionTimer::new(300, 500),
        timings: case_timings(),
    })
}

/// Polls the condition every 20 ms until it holds or the budget runs out.
pub fn wait_until<F>(budget: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + budget;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }

    condition()
}
