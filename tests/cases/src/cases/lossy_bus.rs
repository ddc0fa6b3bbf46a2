use std::time::Duration;

use herald_modules::InProcBroadcastBus;

use crate::steps::cluster;

pub fn run() {
    // every delivery has a 20% chance of vanishing
    let bus = InProcBroadcastBus::with_message_loss(0.2);
    let cluster = cluster::start_cluster(bus, &["node-a", "node-b", "node-c"]);

    // losses delay agreement but must not prevent it; which peer ends up
    // leading depends on what the campaigns happened to see
    let leader_id = cluster.await_stable_leader(Duration::from_secs(20));
    info!("Lossy bus case elected {}", leader_id);

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_lossy_bus() {
        crate::cases::lossy_bus::run()
    }
}
