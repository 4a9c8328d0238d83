// src/recorder/sync_recorder/mock.rs

//! Simulated sensor shared by the recorder tests.
//!
//! One `MockDevice` holds the simulated clock, the receive queue and the
//! counters; the driver, the ports it opens and the clock all point at it.

use super::SensorSession;
use crate::common::{
    frame::LinkConfiguration,
    hal_traits::{LinkClock, LinkDriver, LinkPort},
};
use core::time::Duration;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const PORT: &str = "/dev/ttyMOCK0";
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Link Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockLinkError;

// --- Mock Device ---
#[derive(Debug, Default)]
pub struct MockDevice {
    pub now_us: u64,
    /// Bytes become visible to the host from this instant on.
    pub ready_at_us: u64,
    pub rx: VecDeque<u8>,
    pub written: Vec<u8>,
    pub delays_us: Vec<u64>,
    pub opens: u32,
    pub closes: u32,
    pub flushes: u32,
    pub refuse_open: bool,
    pub fail_writes: bool,
    /// Report pending bytes but never hand them out.
    pub stall_reads: bool,
}

pub type SharedDevice = Rc<RefCell<MockDevice>>;

impl MockDevice {
    pub fn shared() -> SharedDevice {
        Rc::new(RefCell::new(MockDevice::default()))
    }

    pub fn stage(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }

    pub fn stage_line(&mut self, line: &str) {
        self.stage(line.as_bytes());
        self.stage(b"\n");
    }

    fn visible(&self) -> bool {
        self.now_us >= self.ready_at_us
    }

    fn advance(&mut self, us: u64) {
        self.now_us = self.now_us.saturating_add(us);
        self.delays_us.push(us);
    }
}

// --- Mock Port ---
pub struct MockPort {
    device: SharedDevice,
}

impl Drop for MockPort {
    fn drop(&mut self) {
        self.device.borrow_mut().closes += 1;
    }
}

impl LinkPort for MockPort {
    type Error = MockLinkError;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        let device = self.device.borrow();
        Ok(if device.visible() { device.rx.len() } else { 0 })
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let mut device = self.device.borrow_mut();
        if !device.visible() || device.stall_reads {
            return Err(nb::Error::WouldBlock);
        }
        device.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        let mut device = self.device.borrow_mut();
        if device.fail_writes {
            return Err(nb::Error::Other(MockLinkError));
        }
        device.written.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.device.borrow_mut().flushes += 1;
        Ok(())
    }
}

// --- Mock Driver ---
pub struct MockDriver {
    device: SharedDevice,
}

impl MockDriver {
    pub fn new(device: &SharedDevice) -> Self {
        MockDriver {
            device: Rc::clone(device),
        }
    }
}

impl LinkDriver for MockDriver {
    type Port = MockPort;

    fn open(&mut self, _config: &LinkConfiguration) -> Result<MockPort, MockLinkError> {
        let mut device = self.device.borrow_mut();
        device.opens += 1;
        if device.refuse_open {
            return Err(MockLinkError);
        }
        Ok(MockPort {
            device: Rc::clone(&self.device),
        })
    }
}

// --- Mock Clock ---
pub struct MockClock {
    device: SharedDevice,
}

impl MockClock {
    pub fn new(device: &SharedDevice) -> Self {
        MockClock {
            device: Rc::clone(device),
        }
    }
}

impl LinkClock for MockClock {
    type Instant = MockInstant;

    fn now(&self) -> MockInstant {
        MockInstant(self.device.borrow().now_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.device.borrow_mut().advance(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.device.borrow_mut().advance((ms as u64) * 1000);
    }
}

// --- Helpers ---
pub fn config() -> LinkConfiguration {
    LinkConfiguration::new(PORT, 115_200, READ_TIMEOUT)
}

pub fn session(device: &SharedDevice) -> SensorSession<MockDriver, MockClock> {
    SensorSession::new(config(), MockDriver::new(device), MockClock::new(device))
}

/// Session with the link already open, for exercising single stages.
pub fn open_session(device: &SharedDevice) -> SensorSession<MockDriver, MockClock> {
    let mut session = session(device);
    session.link.open().unwrap();
    session
}
