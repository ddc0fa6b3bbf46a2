use std::time::Duration;

use herald::{NodeState, PeerId};
use herald_modules::InProcBroadcastBus;

use crate::steps;
use crate::steps::cluster;

pub fn run() {
    let bus = InProcBroadcastBus::new();
    let cluster = cluster::start_cluster(bus.clone(), &["node-a", "node-b", "node-c"]);

    let leader_id = cluster.await_stable_leader(Duration::from_secs(5));
    assert_eq!(leader_id, PeerId::from("node-a"));

    // cut the leader off: it keeps ruling in silence while the majority
    // elects a replacement, leaving two leaders side by side
    bus.set_partitioned(&PeerId::from("node-a"), true);

    let split = steps::wait_until(Duration::from_secs(5), || {
        cluster.peer("node-a").state() == NodeState::Leader
            && cluster.peer("node-b").state() == NodeState::Leader
    });
    assert!(split, "partition did not produce two simultaneous leaders");

    // the first heartbeats crossing after healing reveal the collision and
    // whichever ruler hears the other first stands down; if both do, the
    // rerun election decides. Either way a single leader must remain.
    bus.set_partitioned(&PeerId::from("node-a"), false);

    let healed_leader = cluster.await_stable_leader(Duration::from_secs(5));
    assert!(
        healed_leader == PeerId::from("node-a") || healed_leader == PeerId::from("node-b"),
        "an uninvolved peer took over after healing: {}",
        healed_leader
    );

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_collision() {
        crate::cases::collision::run()
    }
}
