//! HumonSens command definitions.
//!
//! The device understands a single command: `SX<frequency>\n`, which sets
//! the sampling frequency and triggers a measurement. The sensor answers
//! with one JSON line per sample.

use core::fmt::{self, Write};
use core::time::Duration;

use arrayvec::ArrayString;

use super::{timing, HumonError};

/// Capacity of an encoded command: `SX` + up to 10 digits of a `u32` + `\n`.
pub const COMMAND_CAPACITY: usize = 16;

/// Encoded command bytes, ready to be written to the link.
pub type CommandBuffer = ArrayString<COMMAND_CAPACITY>;

/// Set-frequency command (`SX<frequency>\n`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SamplingCommand {
    frequency: u32,
}

impl SamplingCommand {
    pub fn new(frequency: u32) -> Self {
        SamplingCommand { frequency }
    }

    #[inline]
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Formats the command into a fixed-capacity buffer.
    pub fn format_into(&self) -> Result<CommandBuffer, fmt::Error> {
        let mut buffer = CommandBuffer::new();
        write!(buffer, "{}", self)?;
        Ok(buffer)
    }
}

impl fmt::Display for SamplingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SX{}", self.frequency)
    }
}

/// Encodes the set-frequency command for `frequency`.
pub fn encode_frequency_command(frequency: u32) -> Result<CommandBuffer, fmt::Error> {
    SamplingCommand::new(frequency).format_into()
}

/// Parameters of one measurement: what to ask for and how long to wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SamplingRequest {
    frequency: u32,
    wait_period: Duration,
    max_checks: u32,
}

impl SamplingRequest {
    /// Creates a request. All three parameters must be non-zero.
    pub fn new(frequency: u32, wait_period: Duration, max_checks: u32) -> Result<Self, HumonError> {
        if frequency == 0 {
            return Err(HumonError::InvalidRequest("frequency must be positive"));
        }
        if wait_period.is_zero() {
            return Err(HumonError::InvalidRequest("wait period must be positive"));
        }
        if max_checks == 0 {
            return Err(HumonError::InvalidRequest("max checks must be positive"));
        }
        Ok(SamplingRequest {
            frequency,
            wait_period,
            max_checks,
        })
    }

    /// Same request at another frequency.
    pub fn with_frequency(self, frequency: u32) -> Result<Self, HumonError> {
        Self::new(frequency, self.wait_period, self.max_checks)
    }

    #[inline]
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    #[inline]
    pub fn wait_period(&self) -> Duration {
        self.wait_period
    }

    #[inline]
    pub fn max_checks(&self) -> u32 {
        self.max_checks
    }

    #[inline]
    pub fn command(&self) -> SamplingCommand {
        SamplingCommand::new(self.frequency)
    }
}

impl Default for SamplingRequest {
    fn default() -> Self {
        SamplingRequest {
            frequency: timing::DEFAULT_FREQUENCY,
            wait_period: timing::DEFAULT_WAIT_PERIOD,
            max_checks: timing::DEFAULT_MAX_CHECKS,
        }
    }
}
