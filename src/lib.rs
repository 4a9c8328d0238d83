// src/lib.rs

//! Driver for the HumonSens capacitive sensor.
//!
//! The sensor sits on a serial link (8N1, XON/XOFF). A measurement is one
//! `SX<frequency>\n` command followed by JSON lines from the device; the
//! newest line is decoded into a [`Reading`].
//!
//! ```no_run
//! use std::time::Duration;
//! use humonsens::{adapters, LinkConfiguration, SamplingRequest};
//!
//! let config = LinkConfiguration::new("/dev/ttyUSB0", 115_200, Duration::from_secs(1));
//! let mut session = adapters::serial_session(config);
//! let reading = session.run(&SamplingRequest::default());
//! for (field, value) in reading.fields() {
//!     println!("{field}: {value}");
//! }
//! ```

pub mod adapters;
pub mod common;
pub mod config;
pub mod recorder;

#[cfg(feature = "cli")]
pub mod logging;

#[cfg(test)]
mod log_capture;

// Re-export key types for convenience
pub use common::{HumonError, LinkConfiguration, Reading, SamplingRequest};
pub use recorder::{SensorSession, SessionState};
