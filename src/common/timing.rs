// src/common/timing.rs

use core::time::Duration;

// === Sampling defaults ===
// Values the device firmware was tuned against.

/// Sampling frequency requested when the caller does not pick one.
pub const DEFAULT_FREQUENCY: u32 = 10_000;
/// Delay between two readiness checks.
pub const DEFAULT_WAIT_PERIOD: Duration = Duration::from_millis(600);
/// Number of readiness checks before the poller gives up.
pub const DEFAULT_MAX_CHECKS: u32 = 10;

// === Byte-level I/O ===

/// Delay between two attempts of a byte operation that returned `WouldBlock`.
/// Keeps the deadline loops from spinning at 100% CPU.
pub const IO_RETRY_INTERVAL: Duration = Duration::from_micros(500);
/// Upper bound for writing a single command byte.
pub const WRITE_BYTE_TIMEOUT: Duration = Duration::from_millis(50);
/// Upper bound for flushing the transmit buffer.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(100);

// === Framing ===

/// Longest line accepted from the device, terminator included.
pub const MAX_FRAME_LEN: usize = 1024;
