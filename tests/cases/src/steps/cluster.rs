use std::time::Duration;

use herald::{NodeState, PeerHandle, PeerId};
use herald_modules::InProcBroadcastBus;

use crate::steps;

/// Peer group of one case, started in the given order on a shared bus.
pub struct CaseCluster {
    pub bus: InProcBroadcastBus,
    pub peers: Vec<PeerHandle<InProcBroadcastBus>>,
}

pub fn start_cluster(bus: InProcBroadcastBus, peer_ids: &[&str]) -> CaseCluster {
    info!("Case cluster starting peers {:?}", peer_ids);
    let peers = peer_ids
        .iter()
        .map(|peer_id| steps::start_case_peer(&bus, peer_id))
        .collect();

    CaseCluster { bus, peers }
}

impl CaseCluster {
    pub fn add_peer(&mut self, peer_id: &str) {
        self.peers.push(steps::start_case_peer(&self.bus, peer_id));
    }

    pub fn peer(&self, peer_id: &str) -> &PeerHandle<InProcBroadcastBus> {
        let wanted = PeerId::from(peer_id);
        self.peers
            .iter()
            .find(|peer| *peer.peer_id() == wanted)
            .expect("peer is part of the case cluster")
    }

    pub fn leaders(&self) -> Vec<PeerId> {
        self.peers
            .iter()
            .filter(|peer| peer.state() == NodeState::Leader)
            .map(|peer| peer.peer_id().clone())
            .collect()
    }

    /// Waits until exactly one peer leads and every peer tracks it.
    pub fn await_stable_leader(&self, budget: Duration) -> PeerId {
        let converged = steps::wait_until(budget, || self.is_converged());
        assert!(converged, "no stable leader emerged within {:?}", budget);

        self.leaders()
            .into_iter()
            .next()
            .expect("a converged cluster has a leader")
    }

    fn is_converged(&self) -> bool {
        let leaders = self.leaders();
        if leaders.len() != 1 {
            return false;
        }

        let leader_id = &leaders[0];
        self.peers
            .iter()
            .all(|peer| peer.leader_id().as_ref() == Some(leader_id))
    }

    /// Shuts one peer down, announcing its departure to the others.
    pub fn shutdown_peer(&mut self, peer_id: &str) {
        let wanted = PeerId::from(peer_id);
        let position = self
            .peers
            .iter()
            .position(|peer| *peer.peer_id() == wanted)
            .expect("peer is part of the case cluster");
        self.peers.remove(position).shutdown();
    }

    pub fn terminate(self) {
        info!("Case cluster terminating");
        for peer in self.peers {
            peer.shutdown();
        }
    }
}
