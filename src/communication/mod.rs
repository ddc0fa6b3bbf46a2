use crossbeam_channel::Receiver;

use crate::errors::ElectionError;
use crate::protocol::{PeerId, ProtocolMessage};

/// Best-effort broadcast transport connecting the peers of one group.
///
/// Delivery guarantees are deliberately weak: messages may be lost and may
/// arrive in any order, and a send error means nothing more than that the
/// message was lost. Implementations must never deliver a message back to
/// the subscription of its sender.
pub trait BroadcastBus: Clone + Send + 'static {
    /// Broadcasts a message to every other subscribed peer.
    fn send(&self, message: ProtocolMessage) -> Result<(), ElectionError>;

    /// Registers a peer and returns the stream of messages addressed to it.
    fn subscribe(&self, peer_id: &PeerId) -> BusSubscription;

    /// Drops the peer's subscription. Messages sent afterwards skip it.
    fn unsubscribe(&self, peer_id: &PeerId);
}

/// Receiving side of a bus subscription.
#[derive(Debug)]
pub struct BusSubscription {
    pub peer_id: PeerId,
    pub message_rx: Receiver<ProtocolMessage>,
}
