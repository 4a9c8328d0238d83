// src/recorder/mod.rs

// Host side of the protocol: the datalogger that polls the sensor.
pub mod sync_recorder;

// Re-export the public session types
pub use sync_recorder::{LinkManager, PortError, SensorSession, SessionState};
