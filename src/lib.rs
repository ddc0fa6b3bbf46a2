#![warn(missing_debug_implementations, unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate crossbeam_channel;

mod common;
mod communication;
mod dispatch;
mod engine;
mod errors;
mod leadership;
mod membership;
mod node;
mod observer;
mod protocol;

pub use communication::{BroadcastBus, BusSubscription};
pub use errors::{new_err, ElectionError};
pub use leadership::ElectionTimer;
pub use node::configuration::{NodeConfiguration, PeerTimings};
pub use node::PeerHandle;
pub use observer::{EngineEvent, EventKind, ObserverRegistry, ObserverToken};
pub use protocol::{
    CreateMessage, DestroyMessage, FinishElectionMessage, HeartbeatMessage, NodeState, PeerId,
    ProtocolMessage, StartElectionMessage,
};

/// Starts a peer and returns the handle controlling it.
pub fn start_peer<Bus, Et>(configuration: NodeConfiguration<Bus, Et>) -> PeerHandle<Bus>
where
    Bus: BroadcastBus,
    Et: ElectionTimer,
{
    node::start(configuration)
}
