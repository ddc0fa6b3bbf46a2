use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::communication::BroadcastBus;
use crate::engine::ProtectedEngine;
use crate::leadership::ResolutionCommand;

pub struct ResolveCandidacyParams<Bus: BroadcastBus> {
    pub engine: ProtectedEngine<Bus>,
    pub resolution_timeout: Duration,
    pub commands_rx: Receiver<ResolutionCommand>,
}

/// Holds the one-shot candidacy resolution countdown. Arming replaces any
/// pending countdown, cancelling disarms it. A firing can still race a
/// cancellation, so the engine re-checks the candidacy round on delivery.
pub fn resolve_candidacy<Bus: BroadcastBus>(
    params: ResolveCandidacyParams<Bus>,
    terminate_worker_rx: Receiver<()>,
) {
    info!("Candidacy resolution worker started");
    let mut deadline: Receiver<Instant> = crossbeam_channel::never();
    let mut armed_round = 0;
    loop {
        select!(
            recv(terminate_worker_rx) -> res => {
                if res.is_err() {
                    error!("Abnormal exit for candidacy resolution worker");
                }
                break
            },
            recv(params.commands_rx) -> res => {
                match res {
                    Ok(ResolutionCommand::Arm(round)) => {
                        trace!("Resolution countdown armed for candidacy round {}", round);
                        armed_round = round;
                        deadline = crossbeam_channel::after(params.resolution_timeout);
                    }
                    Ok(ResolutionCommand::Cancel) => {
                        deadline = crossbeam_channel::never();
                    }
                    Err(err) => {
                        error!("Invalid result from resolution commands channel: {}", err);
                        break
                    }
                }
            },
            recv(deadline) -> _ => {
                deadline = crossbeam_channel::never();
                params.engine.lock().resolution_fired(armed_round)
            },
        );
    }
    info!("Candidacy resolution worker stopped");
}
