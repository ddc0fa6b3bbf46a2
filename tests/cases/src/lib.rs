//! # Election test cases
//!
//! This subproject provides integration cases for the election protocol,
//! driving whole peer groups over the in-process broadcast bus.

#[macro_use]
extern crate log;
mod steps;

pub use self::cases::smoke;
