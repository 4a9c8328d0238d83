// src/recorder/sync_recorder/poller.rs

use super::{link::PortError, SensorSession};
use crate::common::{
    error::HumonError,
    hal_traits::{LinkClock, LinkDriver},
};
use core::time::Duration;
use tracing::{debug, info, warn};

impl<D, C> SensorSession<D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    /// Waits for the device to buffer a response.
    ///
    /// Checks the input buffer, sleeping `wait_period` between checks, until
    /// data shows up or `max_checks` sleeps have elapsed. Returns whether data
    /// was detected. Running out of checks is not an error: a late device may
    /// still have buffered something by the time the drain runs.
    pub(super) fn await_data(
        &mut self,
        wait_period: Duration,
        max_checks: u32,
    ) -> Result<bool, HumonError<PortError<D>>> {
        let mut sleep_count: u32 = 0;

        loop {
            let pending = self.bytes_available()?;
            if pending > 0 {
                debug!(pending, sleep_count, "device has data");
                return Ok(true);
            }
            if sleep_count >= max_checks {
                warn!(sleep_count, "no data detected");
                return Ok(false);
            }

            self.clock.delay(wait_period);
            sleep_count += 1;
            info!(sleep_count, "sleep count");
        }
    }
}
