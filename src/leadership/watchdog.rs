use crossbeam_channel::Receiver;

use crate::communication::BroadcastBus;
use crate::engine::ProtectedEngine;
use crate::leadership::ElectionTimer;

pub struct WatchLeaderLivenessParams<Bus, Et>
where
    Bus: BroadcastBus,
    Et: ElectionTimer,
{
    pub engine: ProtectedEngine<Bus>,
    pub election_timer: Et,
}

/// Periodically checks whether the tracked leader went silent. The engine
/// decides; this worker only provides the randomized cadence.
pub fn watch_leader_liveness<Bus, Et>(
    params: WatchLeaderLivenessParams<Bus, Et>,
    terminate_worker_rx: Receiver<()>,
) where
    Bus: BroadcastBus,
    Et: ElectionTimer,
{
    info!("Leader liveness watchdog worker started");
    loop {
        let timeout = crossbeam_channel::after(params.election_timer.next_election_timeout());
        select!(
            recv(terminate_worker_rx) -> res => {
                if res.is_err() {
                    error!("Abnormal exit for leader liveness watchdog worker");
                }
                break
            },
            recv(timeout) -> _ => {
                params.engine.lock().watchdog_fired()
            },
        );
    }
    info!("Leader liveness watchdog worker stopped");
}
