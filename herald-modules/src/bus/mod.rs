use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use rand::Rng;

use herald::{BroadcastBus, BusSubscription, ElectionError, PeerId, ProtocolMessage};

/// In-process broadcast bus connecting peers through channels.
///
/// The bus is best effort by construction: a global loss probability can
/// drop any delivery and individual peers can be partitioned away, in which
/// case their messages vanish in both directions. Messages are never looped
/// back to their sender.
#[derive(Clone, Debug)]
pub struct InProcBroadcastBus {
    shared: Arc<Mutex<BusState>>,
}

#[derive(Debug)]
struct BusState {
    subscriptions: HashMap<PeerId, Sender<ProtocolMessage>>,
    loss_probability: f64,
    partitioned: HashSet<PeerId>,
}

impl InProcBroadcastBus {
    pub fn new() -> InProcBroadcastBus {
        InProcBroadcastBus::with_message_loss(0.0)
    }

    /// Creates a bus that loses each delivery with the given probability.
    pub fn with_message_loss(loss_probability: f64) -> InProcBroadcastBus {
        validate_loss_probability(loss_probability);
        InProcBroadcastBus {
            shared: Arc::new(Mutex::new(BusState {
                subscriptions: HashMap::new(),
                loss_probability,
                partitioned: HashSet::new(),
            })),
        }
    }

    pub fn set_message_loss(&self, loss_probability: f64) {
        validate_loss_probability(loss_probability);
        self.shared.lock().loss_probability = loss_probability;
    }

    /// Cuts a peer off the bus or reconnects it. While partitioned, the
    /// peer's messages are dropped and nothing is delivered to it.
    pub fn set_partitioned(&self, peer_id: &PeerId, partitioned: bool) {
        let mut state = self.shared.lock();
        if partitioned {
            info!("Bus Partitioning peer {}", peer_id);
            state.partitioned.insert(peer_id.clone());
        } else {
            info!("Bus Reconnecting peer {}", peer_id);
            state.partitioned.remove(peer_id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.lock().subscriptions.len()
    }
}

impl Default for InProcBroadcastBus {
    fn default() -> InProcBroadcastBus {
        InProcBroadcastBus::new()
    }
}

fn validate_loss_probability(loss_probability: f64) {
    if !(0.0..=1.0).contains(&loss_probability) {
        panic!("Invalid loss probability: {}", loss_probability)
    }
}

impl BroadcastBus for InProcBroadcastBus {
    fn send(&self, message: ProtocolMessage) -> Result<(), ElectionError> {
        let mut state = self.shared.lock();
        let sender_id = message.sender().clone();

        if state.partitioned.contains(&sender_id) {
            trace!("Bus Dropped {} from partitioned peer {}", message, sender_id);
            return Ok(());
        }

        let mut dead_subscriptions = Vec::new();
        {
            let BusState {
                subscriptions,
                loss_probability,
                partitioned,
            } = &*state;
            let mut rng = rand::thread_rng();

            for (peer_id, message_tx) in subscriptions {
                if *peer_id == sender_id || partitioned.contains(peer_id) {
                    continue;
                }
                if *loss_probability > 0.0 && rng.gen_bool(*loss_probability) {
                    trace!("Bus Lost {} on the way to {}", message, peer_id);
                    continue;
                }
                if message_tx.send(message.clone()).is_err() {
                    dead_subscriptions.push(peer_id.clone());
                }
            }
        }

        for peer_id in dead_subscriptions {
            warn!("Bus Dropping dead subscription of peer {}", peer_id);
            state.subscriptions.remove(&peer_id);
        }

        Ok(())
    }

    fn subscribe(&self, peer_id: &PeerId) -> BusSubscription {
        let (message_tx, message_rx) = crossbeam_channel::unbounded();
        let previous = self
            .shared
            .lock()
            .subscriptions
            .insert(peer_id.clone(), message_tx);
        if previous.is_some() {
            warn!("Bus Peer {} subscribed twice, dropping the old subscription", peer_id);
        }

        BusSubscription {
            peer_id: peer_id.clone(),
            message_rx,
        }
    }

    fn unsubscribe(&self, peer_id: &PeerId) {
        self.shared.lock().subscriptions.remove(peer_id);
    }
}
