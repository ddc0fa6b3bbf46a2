use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::communication::BroadcastBus;
use crate::leadership::ResolutionCommand;
use crate::membership::ActivePeerSet;
use crate::node::configuration::PeerTimings;
use crate::observer::{EngineEvent, ObserverRegistry};
use crate::protocol::{
    CreateMessage, DestroyMessage, FinishElectionMessage, HeartbeatMessage, NodeState, PeerId,
    ProtocolMessage, StartElectionMessage,
};


/// Engine shared between the worker threads of one peer. The mutex is what
/// serializes message handling against timer firings.
pub type ProtectedEngine<Bus> = Arc<Mutex<ElectionEngine<Bus>>>;

/// Core election state machine of a single peer.
///
/// The engine itself is passive: the dispatch worker feeds it bus messages
/// and the timer workers call [`watchdog_fired`](ElectionEngine::watchdog_fired)
/// and [`resolution_fired`](ElectionEngine::resolution_fired). Every entry
/// point runs under the engine mutex, so transitions never interleave.
pub struct ElectionEngine<Bus: BroadcastBus> {
    peer_id: PeerId,
    state: NodeState,
    leader_id: Option<PeerId>,
    active_peers: ActivePeerSet,
    last_leader_heartbeat: Instant,
    candidacy_round: u64,
    timings: PeerTimings,
    bus: Bus,
    observers: ObserverRegistry,
    resolution_tx: Sender<ResolutionCommand>,
}

impl<Bus: BroadcastBus> ElectionEngine<Bus> {
    pub fn new(
        peer_id: PeerId,
        timings: PeerTimings,
        bus: Bus,
        observers: ObserverRegistry,
        resolution_tx: Sender<ResolutionCommand>,
    ) -> ElectionEngine<Bus> {
        let active_peers = ActivePeerSet::new(peer_id.clone());

        ElectionEngine {
            peer_id,
            state: NodeState::Follower,
            leader_id: None,
            active_peers,
            last_leader_heartbeat: Instant::now(),
            candidacy_round: 0,
            timings,
            bus,
            observers,
            resolution_tx,
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn leader_id(&self) -> Option<&PeerId> {
        self.leader_id.as_ref()
    }

    pub fn active_peer_ids(&self) -> Vec<PeerId> {
        self.active_peers.peer_ids()
    }

    /// Announces this peer on the bus. Called once right after subscribing,
    /// before any worker runs.
    pub fn announce_join(&self) {
        self.broadcast(ProtocolMessage::Create(CreateMessage {
            sender: self.peer_id.clone(),
        }));
    }

    /// Entry point for every message delivered by the bus subscription.
    pub fn handle_message(&mut self, message: ProtocolMessage) {
        if message.sender() == &self.peer_id {
            trace!("Node {} Ignoring own {} echoed by the bus", self.peer_id, message);
            return;
        }

        match message {
            ProtocolMessage::Heartbeat(message) => self.on_heartbeat(message),
            ProtocolMessage::StartElection(message) => self.on_start_election(message),
            ProtocolMessage::FinishElection(message) => self.on_finish_election(message),
            ProtocolMessage::Create(message) => self.on_create(message),
            ProtocolMessage::Destroy(message) => self.on_destroy(message),
        }
    }

    fn on_heartbeat(&mut self, message: HeartbeatMessage) {
        self.active_peers.observe(message.sender.clone());

        if message.state != NodeState::Leader {
            // candidate heartbeats only feed the peer set
            return;
        }

        self.last_leader_heartbeat = Instant::now();

        if self.state == NodeState::Leader {
            warn!(
                "Node {} Leadership collision with {}. Demoting and restarting election",
                self.peer_id, message.sender
            );
            self.become_follower(None);
            self.begin_candidacy();
            return;
        }

        self.become_follower(Some(message.sender));
    }

    fn on_start_election(&mut self, message: StartElectionMessage) {
        trace!(
            "Node {} Election requested by {}",
            self.peer_id, message.sender
        );
        self.begin_candidacy();
    }

    fn on_finish_election(&mut self, message: FinishElectionMessage) {
        let local_pick = self.active_peers.pick_leader();
        if *local_pick != message.leader {
            warn!(
                "Node {} Election outcome mismatch: picked {} locally, {} announced by {}",
                self.peer_id, local_pick, message.leader, message.sender
            );
        }
    }

    fn on_create(&mut self, message: CreateMessage) {
        info!("Node {} Peer {} joined", self.peer_id, message.sender);
        self.active_peers.observe(message.sender);

        match self.state {
            // spare the newcomer a full staleness wait
            NodeState::Leader => self.emit_heartbeat(),
            // make sure the newcomer takes part in the running election
            NodeState::Candidate => self.announce_candidacy(),
            NodeState::Follower => {}
        }
    }

    fn on_destroy(&mut self, message: DestroyMessage) {
        info!(
            "Node {} Peer {} left as {}",
            self.peer_id, message.sender, message.state
        );
        self.active_peers.remove(&message.sender);

        if message.state != NodeState::Leader {
            return;
        }

        let lost_own_leader = match &self.leader_id {
            Some(leader_id) => *leader_id == message.sender,
            None => true,
        };
        if lost_own_leader {
            self.leader_id = None;
            self.begin_candidacy();
        }
    }

    /// Called by the watchdog worker on its randomized cadence. Starts a
    /// candidacy when the tracked leader has been silent for too long.
    pub fn watchdog_fired(&mut self) {
        if self.state == NodeState::Leader {
            // a leader never times itself out
            return;
        }

        if self.last_leader_heartbeat.elapsed() > self.timings.staleness_threshold() {
            self.begin_candidacy();
        }
    }

    /// Called by the resolution worker when the candidacy countdown fires.
    /// Stale firings, recognizable by an outdated round, are dropped.
    pub fn resolution_fired(&mut self, round: u64) {
        if self.state != NodeState::Candidate || round != self.candidacy_round {
            trace!(
                "Node {} Dropping stale resolution firing for round {}",
                self.peer_id, round
            );
            return;
        }

        self.finish_candidacy();
    }

    /// Called by the heartbeat ticker. Also serves resume requests.
    pub fn heartbeat_tick(&self) {
        self.emit_heartbeat();
    }

    /// Announces departure with the role held at that moment. The caller
    /// stops all workers first, so no further transition can follow.
    pub fn broadcast_departure(&self) {
        info!("Node {} Leaving the group as {}", self.peer_id, self.state);
        self.broadcast(ProtocolMessage::Destroy(DestroyMessage {
            sender: self.peer_id.clone(),
            state: self.state,
        }));
    }

    fn begin_candidacy(&mut self) {
        if self.state != NodeState::Follower {
            // candidates are already campaigning and leaders stand down
            // only through collision handling
            return;
        }

        info!("Node {} Starting new election", self.peer_id);
        self.announce_candidacy();
        self.leader_id = None;
        self.set_state(NodeState::Candidate);
        self.active_peers.reset_to_local();
        self.candidacy_round += 1;
        self.arm_resolution(self.candidacy_round);
    }

    fn finish_candidacy(&mut self) {
        let leader_id = self.active_peers.pick_leader().clone();
        info!(
            "Node {} Resolving candidacy among {} active peers in favor of {}",
            self.peer_id,
            self.active_peers.peer_count(),
            leader_id
        );

        self.last_leader_heartbeat = Instant::now();
        if leader_id == self.peer_id {
            self.become_leader();
        } else {
            self.become_follower(Some(leader_id.clone()));
        }

        self.broadcast(ProtocolMessage::FinishElection(FinishElectionMessage {
            sender: self.peer_id.clone(),
            leader: leader_id,
        }));
    }

    fn become_leader(&mut self) {
        self.leader_id = Some(self.peer_id.clone());
        self.set_state(NodeState::Leader);
    }

    fn become_follower(&mut self, leader_id: Option<PeerId>) {
        self.leader_id = leader_id;
        self.set_state(NodeState::Follower);
    }

    fn set_state(&mut self, new_state: NodeState) {
        if self.state == new_state {
            return;
        }

        if self.state == NodeState::Candidate {
            self.cancel_resolution();
        }

        self.state = new_state;
        info!("Node {} State changed to {}", self.peer_id, new_state);
        self.observers.publish(&EngineEvent::StateChange(new_state));
        self.emit_heartbeat();
    }

    fn emit_heartbeat(&self) {
        if self.state == NodeState::Follower {
            // followers never announce themselves proactively
            return;
        }

        trace!("Node {} Sending heartbeat as {}", self.peer_id, self.state);
        self.broadcast(ProtocolMessage::Heartbeat(HeartbeatMessage {
            sender: self.peer_id.clone(),
            state: self.state,
        }));
    }

    fn announce_candidacy(&self) {
        self.broadcast(ProtocolMessage::StartElection(StartElectionMessage {
            sender: self.peer_id.clone(),
        }));
    }

    fn arm_resolution(&self, round: u64) {
        if let Err(err) = self.resolution_tx.send(ResolutionCommand::Arm(round)) {
            error!(
                "Node {} Cannot arm the resolution countdown: {}",
                self.peer_id, err
            );
        }
    }

    fn cancel_resolution(&self) {
        if let Err(err) = self.resolution_tx.send(ResolutionCommand::Cancel) {
            error!(
                "Node {} Cannot cancel the resolution countdown: {}",
                self.peer_id, err
            );
        }
    }

    fn broadcast(&self, message: ProtocolMessage) {
        // a failed send equals a lost message on this kind of bus
        if let Err(err) = self.bus.send(message) {
            warn!("Node {} Broadcast lost: {}", self.peer_id, err);
        }
    }
}
