// src/adapters/mod.rs

// Platform implementations of the link traits.
pub mod std_clock;

#[cfg(feature = "serialport")]
pub mod serial;

pub use std_clock::StdClock;

#[cfg(feature = "serialport")]
pub use serial::{available_ports, serial_session, SerialDriver, SerialLink, SerialSession};
