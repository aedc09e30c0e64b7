#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

//! # ADC monitor
//!
//! The monitoring loop of the Feather M0 ADC demo, written against the [`Board`] trait so it can
//! run on the real board or against a simulated one on the host.
//!
//! While the enable switch is released the loop samples one ADC input and toggles the status LED.
//! While it is held the loop brings up a USB CDC ACM serial port, waits for the host to enumerate
//! it and then streams one text line per iteration with the variable-resistor and battery counts.

#[macro_use]
mod fmt;

pub mod board;
pub mod config;
pub mod error;
pub mod link;
pub mod monitor;
pub mod mux;
pub mod report;

pub use board::Board;
pub use config::{Config, IdleInput};
pub use error::Error;
pub use link::{LinkSession, LinkState};
pub use monitor::{Monitor, State, Stats, Step};
pub use mux::{MuxNeg, MuxPos, MuxSelection, BATTERY, VARIABLE_RESISTOR};
pub use report::{
    counts_to_millivolts, Line, Reading, DEFAULT_VREF_MV, LINE_CAPACITY, LONGEST_LINE,
};
