use std::time::Duration;

use herald::{BroadcastBus, NodeConfiguration, NodeState, PeerId, ProtocolMessage};
use herald_modules::{FixedElectionTimer, InProcBroadcastBus};

use crate::steps;

pub fn run() {
    // every delivery vanishes, so the peer is effectively alone even with
    // the probe subscribed
    let bus = InProcBroadcastBus::with_message_loss(1.0);
    let probe = bus.subscribe(&PeerId::from("probe"));

    // no competition, so the watchdog needs no randomization
    let peer = herald::start_peer(NodeConfiguration {
        peer_id: PeerId::from("node-solo"),
        bus: bus.clone(),
        election_timer: FixedElectionTimer::new(300),
        timings: steps::case_timings(),
    });

    // total loss must not prevent the peer from electing itself
    let elected = steps::wait_until(Duration::from_secs(3), || {
        peer.state() == NodeState::Leader
            && peer.leader_id() == Some(PeerId::from("node-solo"))
    });
    assert!(elected, "a peer alone on the bus did not elect itself");
    assert_eq!(peer.active_peers(), vec![PeerId::from("node-solo")]);

    // restore delivery: resume produces a prompt out-of-cadence heartbeat
    bus.set_message_loss(0.0);
    while probe.message_rx.try_recv().is_ok() {}
    peer.resume();
    let heartbeat_seen = steps::wait_until(Duration::from_millis(50), || {
        probe
            .message_rx
            .try_iter()
            .any(|message| matches!(message, ProtocolMessage::Heartbeat(_)))
    });
    assert!(heartbeat_seen, "resume did not produce an immediate heartbeat");

    peer.shutdown();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_lone_peer() {
        crate::cases::lone_peer::run()
    }
}
