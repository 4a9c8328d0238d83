// src/adapters/std_clock.rs

use crate::common::hal_traits::LinkClock;
use std::time::{Duration, Instant};

/// Wall-clock time and `thread::sleep` based delays.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdClock;

impl LinkClock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
