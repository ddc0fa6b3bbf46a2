#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;

mod steps;

use chrono::prelude::{DateTime, Local};
use std::io::Write;

extern crate herald;
extern crate herald_modules;

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

    cases::smoke::run();
    cases::late_join::run();
    cases::leader_departure::run();
    cases::collision::run();
    cases::lone_peer::run();
    cases::lossy_bus::run();
    cases::observer_notifications::run();
}
