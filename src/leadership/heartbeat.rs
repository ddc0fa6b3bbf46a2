use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::communication::BroadcastBus;
use crate::engine::ProtectedEngine;

pub struct SendHeartbeatsParams<Bus: BroadcastBus> {
    pub engine: ProtectedEngine<Bus>,
    pub heartbeat_interval: Duration,
    pub resume_rx: Receiver<()>,
}

/// Drives the fixed-rate heartbeat tick and serves resume requests with an
/// immediate extra tick. The engine sends only while Leader or Candidate.
pub fn send_heartbeats<Bus: BroadcastBus>(
    params: SendHeartbeatsParams<Bus>,
    terminate_worker_rx: Receiver<()>,
) {
    info!("Heartbeat ticker worker started");
    let mut resume_rx = params.resume_rx.clone();
    loop {
        let tick = crossbeam_channel::after(params.heartbeat_interval);
        select!(
            recv(terminate_worker_rx) -> res => {
                if res.is_err() {
                    error!("Abnormal exit for heartbeat ticker worker");
                }
                break
            },
            recv(tick) -> _ => {
                params.engine.lock().heartbeat_tick()
            },
            recv(resume_rx) -> res => {
                if res.is_err() {
                    // handle dropped without shutdown; stop listening for resumes
                    resume_rx = crossbeam_channel::never();
                    continue
                }
                trace!("Resume requested, sending immediate heartbeat");
                params.engine.lock().heartbeat_tick()
            },
        );
    }
    info!("Heartbeat ticker worker stopped");
}
