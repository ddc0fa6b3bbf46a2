use std::time::Duration;

use herald::NodeState;
use herald_modules::InProcBroadcastBus;

use crate::steps;
use crate::steps::observers::{DestroyRecorder, StateChangeRecorder};

pub fn run() {
    let bus = InProcBroadcastBus::new();
    let peer = steps::start_case_peer(&bus, "node-solo");

    let state_changes = StateChangeRecorder::attach(&peer);
    let destroys = DestroyRecorder::attach(&peer);
    let silenced = DestroyRecorder::attach(&peer);

    let elected = steps::wait_until(Duration::from_secs(3), || {
        peer.state() == NodeState::Leader
    });
    assert!(elected, "a peer alone on the bus did not elect itself");

    // one notification per actual transition, in order
    assert_eq!(
        state_changes.recorded(),
        vec![NodeState::Candidate, NodeState::Leader]
    );

    // an unregistered observer hears nothing further
    assert!(peer.off(silenced.token()));

    peer.shutdown();

    assert_eq!(destroys.count(), 1);
    assert_eq!(silenced.count(), 0);
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_observer_notifications() {
        crate::cases::observer_notifications::run()
    }
}
