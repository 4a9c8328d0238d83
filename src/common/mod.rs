// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod reading;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{encode_frequency_command, CommandBuffer, SamplingCommand, SamplingRequest};

// From error.rs
pub use error::HumonError;

// From frame.rs
pub use frame::{DataBits, LinkConfiguration, Parity, StopBits};

// From hal_traits.rs
pub use hal_traits::{LinkClock, LinkDriver, LinkInstant, LinkPort};

// From reading.rs
pub use reading::{
    decode, parse_frame, DecodeError, Fields, RawFrame, Reading, ASKED_FREQUENCY_FIELD,
};

// From timing.rs (constants - users can access via common::timing::*)
