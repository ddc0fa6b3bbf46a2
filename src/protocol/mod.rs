use derive_more::Display;
use uuid::Uuid;

/// Identity of a peer on the broadcast bus.
///
/// Ordering is the plain lexicographic order of the underlying string and is
/// the total order elections are decided by: the smallest active id wins.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{}", _0)]
pub struct PeerId(String);

impl PeerId {
    /// Creates a fresh random identity.
    pub fn generate() -> PeerId {
        PeerId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> PeerId {
        PeerId(id)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> PeerId {
        PeerId(id.to_string())
    }
}

/// Election role of a peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum NodeState {
    #[display(fmt = "Follower")]
    Follower,
    #[display(fmt = "Candidate")]
    Candidate,
    #[display(fmt = "Leader")]
    Leader,
}

/// Periodic liveness announcement. Carries the sender's current role so
/// receivers can tell a ruling leader from a campaigning candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeartbeatMessage {
    pub sender: PeerId,
    pub state: NodeState,
}

/// Asks every peer to begin a candidacy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartElectionMessage {
    pub sender: PeerId,
}

/// Announces the sender's locally computed election outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishElectionMessage {
    pub sender: PeerId,
    pub leader: PeerId,
}

/// Announces that the sender joined the bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateMessage {
    pub sender: PeerId,
}

/// Announces that the sender is leaving the bus. Carries the role the sender
/// held at departure so receivers know whether the leader is gone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestroyMessage {
    pub sender: PeerId,
    pub state: NodeState,
}

/// Everything that travels over the broadcast bus.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum ProtocolMessage {
    #[display(fmt = "Heartbeat")]
    Heartbeat(HeartbeatMessage),
    #[display(fmt = "StartElection")]
    StartElection(StartElectionMessage),
    #[display(fmt = "FinishElection")]
    FinishElection(FinishElectionMessage),
    #[display(fmt = "Create")]
    Create(CreateMessage),
    #[display(fmt = "Destroy")]
    Destroy(DestroyMessage),
}

impl ProtocolMessage {
    pub fn sender(&self) -> &PeerId {
        match self {
            ProtocolMessage::Heartbeat(message) => &message.sender,
            ProtocolMessage::StartElection(message) => &message.sender,
            ProtocolMessage::FinishElection(message) => &message.sender,
            ProtocolMessage::Create(message) => &message.sender,
            ProtocolMessage::Destroy(message) => &message.sender,
        }
    }
}
