use std::collections::BTreeSet;

use crate::protocol::PeerId;

/// Set of peers currently believed to be alive, always including the local
/// peer. Backed by an ordered set so the election winner is the first entry.
#[derive(Clone, Debug)]
pub struct ActivePeerSet {
    local_id: PeerId,
    peers: BTreeSet<PeerId>,
}

impl ActivePeerSet {
    pub fn new(local_id: PeerId) -> ActivePeerSet {
        let mut peers = BTreeSet::new();
        peers.insert(local_id.clone());

        ActivePeerSet { local_id, peers }
    }

    /// Registers a peer as alive. Duplicates are absorbed.
    pub fn observe(&mut self, peer_id: PeerId) -> bool {
        self.peers.insert(peer_id)
    }

    /// Removes a departed peer. The local peer cannot be removed.
    pub fn remove(&mut self, peer_id: &PeerId) -> bool {
        if *peer_id == self.local_id {
            return false;
        }

        self.peers.remove(peer_id)
    }

    /// Forgets every peer except the local one. Candidacies start from this
    /// blank slate and rebuild the set from incoming heartbeats.
    pub fn reset_to_local(&mut self) {
        self.peers.clear();
        self.peers.insert(self.local_id.clone());
    }

    /// The peer every member must converge on: the smallest active id.
    pub fn pick_leader(&self) -> &PeerId {
        self.peers
            .iter()
            .next()
            .expect("peer set always contains the local peer")
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Snapshot of the active ids in ascending order.
    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.peers.iter().cloned().collect()
    }
}
