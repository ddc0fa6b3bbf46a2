#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;

use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::prelude::{DateTime, Local};

extern crate herald;
extern crate herald_modules;

use herald::{
    EngineEvent, EventKind, NodeConfiguration, NodeState, PeerHandle, PeerId, PeerTimings,
};
use herald_modules::{InProcBroadcastBus, RandomizedElectionTimer};

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            let now_str = now.format("%H:%M:%S.%3f").to_string();
            writeln!(buf, "{:5}: {} - {}", record.level(), now_str, record.args())
        })
        .init();
}

fn main() {
    init_logger();

    info!("Demo group starting");
    let bus = InProcBroadcastBus::new();

    let peer_ids = vec![
        PeerId::from("peer-alpha"),
        PeerId::from("peer-bravo"),
        PeerId::from("peer-charlie"),
        PeerId::generate(),
    ];

    let mut peers: Vec<PeerHandle<InProcBroadcastBus>> = Vec::new();
    for peer_id in peer_ids {
        let peer = start_demo_peer(&bus, peer_id);
        watch_transitions(&peer);
        peers.push(peer);
    }

    thread::sleep(Duration::from_secs(4));
    let leader_id = current_leader(&peers).expect("the group should have elected a leader");
    info!("Group elected {}", leader_id);

    info!("Shutting the leader down");
    let position = peers
        .iter()
        .position(|peer| *peer.peer_id() == leader_id)
        .expect("leader is one of the started peers");
    peers.remove(position).shutdown();

    thread::sleep(Duration::from_secs(4));
    let successor_id =
        current_leader(&peers).expect("the survivors should have elected a successor");
    info!("Group elected {} as successor", successor_id);

    for peer in peers {
        peer.shutdown();
    }
    info!("Demo finished");
}

fn start_demo_peer(bus: &InProcBroadcastBus, peer_id: PeerId) -> PeerHandle<InProcBroadcastBus> {
    herald::start_peer(NodeConfiguration {
        peer_id,
        bus: bus.clone(),
        election_timer: RandomizedElectionTimer::new(700, 1200),
        timings: PeerTimings {
            heartbeat_interval: Duration::from_millis(200),
            staleness_multiplier: 3,
            resolution_timeout: Duration::from_millis(1500),
        },
    })
}

fn watch_transitions(peer: &PeerHandle<InProcBroadcastBus>) {
    let peer_id = peer.peer_id().clone();
    peer.on(EventKind::StateChange, move |event| {
        if let EngineEvent::StateChange(state) = event {
            info!("Observer: {} is now {}", peer_id, state);
        }
    });
}

fn current_leader(peers: &[PeerHandle<InProcBroadcastBus>]) -> Option<PeerId> {
    peers
        .iter()
        .find(|peer| peer.state() == NodeState::Leader)
        .map(|peer| peer.peer_id().clone())
}
