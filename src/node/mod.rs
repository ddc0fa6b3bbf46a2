use core::fmt;
use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::common;
use crate::common::WorkerPool;
use crate::communication::BroadcastBus;
use crate::dispatch::{process_bus_messages, BusDispatchParams};
use crate::engine::{ElectionEngine, ProtectedEngine};
use crate::leadership::heartbeat::{send_heartbeats, SendHeartbeatsParams};
use crate::leadership::resolution::{resolve_candidacy, ResolveCandidacyParams};
use crate::leadership::watchdog::{watch_leader_liveness, WatchLeaderLivenessParams};
use crate::leadership::ElectionTimer;
use crate::observer::{EngineEvent, EventKind, ObserverRegistry, ObserverToken};
use crate::protocol::{NodeState, PeerId};

pub mod configuration;

use configuration::NodeConfiguration;

/// Starts one peer: subscribes it to the bus, announces it to the group and
/// spawns its worker threads. The peer participates in elections until
/// [`PeerHandle::shutdown`] is called.
pub fn start<Bus, Et>(configuration: NodeConfiguration<Bus, Et>) -> PeerHandle<Bus>
where
    Bus: BroadcastBus,
    Et: ElectionTimer,
{
    let NodeConfiguration {
        peer_id,
        bus,
        election_timer,
        timings,
    } = configuration;

    let observers = ObserverRegistry::new();
    let (resolution_tx, resolution_rx) = crossbeam_channel::unbounded();
    let (resume_tx, resume_rx) = crossbeam_channel::unbounded();

    // subscribe before announcing so responses to the announcement arrive
    let subscription = bus.subscribe(&peer_id);

    let engine = ElectionEngine::new(
        peer_id.clone(),
        timings,
        bus.clone(),
        observers.clone(),
        resolution_tx,
    );
    engine.announce_join();

    let protected_engine: ProtectedEngine<Bus> = Arc::new(Mutex::new(engine));

    let dispatch_worker = common::run_worker(
        process_bus_messages,
        BusDispatchParams {
            engine: protected_engine.clone(),
            subscription,
        },
    );
    let heartbeat_worker = common::run_worker(
        send_heartbeats,
        SendHeartbeatsParams {
            engine: protected_engine.clone(),
            heartbeat_interval: timings.heartbeat_interval,
            resume_rx,
        },
    );
    let watchdog_worker = common::run_worker(
        watch_leader_liveness,
        WatchLeaderLivenessParams {
            engine: protected_engine.clone(),
            election_timer,
        },
    );
    let resolution_worker = common::run_worker(
        resolve_candidacy,
        ResolveCandidacyParams {
            engine: protected_engine.clone(),
            resolution_timeout: timings.resolution_timeout,
            commands_rx: resolution_rx,
        },
    );

    info!("Node {} started", peer_id);

    PeerHandle {
        peer_id,
        engine: protected_engine,
        observers,
        resume_tx,
        bus,
        worker_pool: WorkerPool::new(vec![
            dispatch_worker,
            heartbeat_worker,
            watchdog_worker,
            resolution_worker,
        ]),
    }
}

/// Owner's view of a running peer.
pub struct PeerHandle<Bus: BroadcastBus> {
    peer_id: PeerId,
    engine: ProtectedEngine<Bus>,
    observers: ObserverRegistry,
    resume_tx: Sender<()>,
    bus: Bus,
    worker_pool: WorkerPool,
}

impl<Bus: BroadcastBus> PeerHandle<Bus> {
    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    /// Current election role.
    pub fn state(&self) -> NodeState {
        self.engine.lock().state()
    }

    /// Identity of the peer currently followed as leader, if any. While this
    /// peer leads, that is its own id.
    pub fn leader_id(&self) -> Option<PeerId> {
        self.engine.lock().leader_id().cloned()
    }

    /// Ascending snapshot of the peers currently believed to be alive.
    pub fn active_peers(&self) -> Vec<PeerId> {
        self.engine.lock().active_peer_ids()
    }

    /// Registers an observer callback. Callbacks run synchronously on the
    /// engine workers and must not call back into this handle, except for
    /// [`on`](PeerHandle::on), [`off`](PeerHandle::off) and
    /// [`resume`](PeerHandle::resume).
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ObserverToken
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        self.observers.on(kind, callback)
    }

    /// Unregisters an observer callback. Returns false for unknown tokens.
    pub fn off(&self, token: ObserverToken) -> bool {
        self.observers.off(token)
    }

    /// Asks for an immediate out-of-cadence heartbeat. Useful after the
    /// process was suspended and peers may have written this one off.
    pub fn resume(&self) {
        if let Err(err) = self.resume_tx.send(()) {
            error!("Node {} Cannot request resume: {}", self.peer_id, err);
        }
    }

    /// Takes the peer off the bus: stops all workers, announces departure
    /// with the role held at that moment and publishes the final
    /// [`EngineEvent::Destroy`] to observers.
    pub fn shutdown(self) {
        let PeerHandle {
            peer_id,
            engine,
            observers,
            resume_tx,
            bus,
            worker_pool,
        } = self;

        // stop the workers first so no heartbeat can follow the departure
        worker_pool.terminate();
        worker_pool.join();

        engine.lock().broadcast_departure();
        bus.unsubscribe(&peer_id);
        observers.publish(&EngineEvent::Destroy);
        drop(resume_tx);

        info!("Node {} destroyed", peer_id);
    }
}

impl<Bus: BroadcastBus> fmt::Debug for PeerHandle<Bus> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PeerHandle")
            .field("peer_id", &self.peer_id)
            .finish()
    }
}
