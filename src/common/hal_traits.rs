// src/common/hal_traits.rs

use super::frame::LinkConfiguration;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Monotonic point in time as produced by a [`LinkClock`].
///
/// `std::time::Instant` satisfies this, as does any simulated clock that can
/// be advanced by a `Duration` and compared.
pub trait LinkInstant: Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration> {}

impl<T> LinkInstant for T where T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration> {}

/// Abstraction for time keeping and blocking delays.
pub trait LinkClock {
    type Instant: LinkInstant;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Delay for at least `duration`. Sub-microsecond remainders round up.
    fn delay(&mut self, duration: Duration) {
        let whole_ms = duration.as_millis().min(u32::MAX as u128) as u32;
        if whole_ms > 0 {
            self.delay_ms(whole_ms);
        }
        let rest_us = (duration.subsec_nanos() % 1_000_000).div_ceil(1_000);
        if rest_us > 0 {
            self.delay_us(rest_us);
        }
    }
}

/// An open communication channel to the sensor.
pub trait LinkPort {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Number of received bytes waiting in the input buffer.
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Attempts to read a single byte from the link.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the link.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the transmit buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Opens [`LinkPort`]s for a given configuration.
///
/// Closing is done by dropping the port.
pub trait LinkDriver {
    type Port: LinkPort;

    fn open(
        &mut self,
        config: &LinkConfiguration,
    ) -> Result<Self::Port, <Self::Port as LinkPort>::Error>;
}
