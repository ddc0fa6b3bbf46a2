use core::fmt;
use std::time::Duration;

use crate::communication::BroadcastBus;
use crate::leadership::ElectionTimer;
use crate::protocol::PeerId;

/// Fixed protocol delays of one peer. The randomized watchdog delay lives in
/// the [`ElectionTimer`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeerTimings {
    /// Cadence of the heartbeat ticker.
    pub heartbeat_interval: Duration,
    /// Leader silence is tolerated for this many heartbeat intervals.
    pub staleness_multiplier: u32,
    /// How long a candidacy collects competing peers before resolving.
    pub resolution_timeout: Duration,
}

impl PeerTimings {
    /// Leader silence longer than this makes the watchdog start an election.
    pub fn staleness_threshold(&self) -> Duration {
        self.heartbeat_interval * self.staleness_multiplier
    }
}

impl Default for PeerTimings {
    fn default() -> PeerTimings {
        PeerTimings {
            heartbeat_interval: Duration::from_millis(500),
            staleness_multiplier: 3,
            resolution_timeout: Duration::from_secs(10),
        }
    }
}

/// Everything needed to start one peer.
pub struct NodeConfiguration<Bus, Et>
where
    Bus: BroadcastBus,
    Et: ElectionTimer,
{
    pub peer_id: PeerId,
    pub bus: Bus,
    pub election_timer: Et,
    pub timings: PeerTimings,
}

impl<Bus, Et> fmt::Debug for NodeConfiguration<Bus, Et>
where
    Bus: BroadcastBus,
    Et: ElectionTimer,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeConfiguration")
            .field("peer_id", &self.peer_id)
            .field("timings", &self.timings)
            .finish()
    }
}
