use crossbeam_channel::Receiver;

use crate::communication::{BroadcastBus, BusSubscription};
use crate::engine::ProtectedEngine;

pub struct BusDispatchParams<Bus: BroadcastBus> {
    pub engine: ProtectedEngine<Bus>,
    pub subscription: BusSubscription,
}

/// Feeds every message from the bus subscription into the engine, one at a
/// time. Together with the engine mutex this serializes message handling
/// against the timer workers.
pub fn process_bus_messages<Bus: BroadcastBus>(
    params: BusDispatchParams<Bus>,
    terminate_worker_rx: Receiver<()>,
) {
    let node_id = params.subscription.peer_id.clone();
    info!("Node {} Bus dispatch worker started", node_id);
    loop {
        select!(
            recv(terminate_worker_rx) -> res => {
                if res.is_err() {
                    error!("Abnormal exit for bus dispatch worker");
                }
                break
            },
            recv(params.subscription.message_rx) -> res => {
                match res {
                    Ok(message) => {
                        trace!("Node {} Received {} from {}", node_id, message, message.sender());
                        params.engine.lock().handle_message(message)
                    }
                    Err(err) => {
                        warn!("Node {} Broadcast bus closed: {}", node_id, err);
                        break
                    }
                }
            },
        );
    }
    info!("Node {} Bus dispatch worker stopped", node_id);
}
