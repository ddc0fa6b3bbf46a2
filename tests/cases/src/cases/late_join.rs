use std::time::Duration;

use herald::{NodeState, PeerId};
use herald_modules::InProcBroadcastBus;

use crate::steps;
use crate::steps::cluster;
use crate::steps::observers::StateChangeRecorder;

pub fn run() {
    let bus = InProcBroadcastBus::new();
    let mut cluster = cluster::start_cluster(bus, &["node-a", "node-b"]);

    let leader_id = cluster.await_stable_leader(Duration::from_secs(5));
    assert_eq!(leader_id, PeerId::from("node-a"));

    // the ruling leader answers the join announcement right away, so the
    // newcomer adopts it long before its own watchdog could fire
    cluster.add_peer("node-d");
    let recorder = StateChangeRecorder::attach(cluster.peer("node-d"));

    let adopted = steps::wait_until(Duration::from_millis(250), || {
        let newcomer = cluster.peer("node-d");
        newcomer.state() == NodeState::Follower
            && newcomer.leader_id() == Some(PeerId::from("node-a"))
    });
    assert!(adopted, "newcomer did not adopt the ruling leader");

    // give a late campaign the chance to surface before judging
    steps::sleep_ms(200);
    assert!(
        recorder.recorded().is_empty(),
        "newcomer changed state on the way in: {:?}",
        recorder.recorded()
    );
    assert_eq!(cluster.peer("node-a").state(), NodeState::Leader);
    assert!(cluster.peer("node-d").off(recorder.token()));

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_late_join() {
        crate::cases::late_join::run()
    }
}
