#[macro_use]
extern crate log;
extern crate crossbeam_channel;
extern crate herald;

mod bus;
mod election;

pub use bus::InProcBroadcastBus;
pub use election::fixed_election_timer::FixedElectionTimer;
pub use election::randomized_election_timer::RandomizedElectionTimer;
