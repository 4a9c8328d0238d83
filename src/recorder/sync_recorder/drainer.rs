// src/recorder/sync_recorder/drainer.rs

use super::{link::PortError, SensorSession};
use crate::common::{
    error::HumonError,
    hal_traits::{LinkClock, LinkDriver},
    reading::RawFrame,
};
use tracing::{debug, info, warn};

impl<D, C> SensorSession<D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    /// Consumes every buffered line and keeps the last one.
    ///
    /// The device can queue lines faster than they are read; only the newest
    /// one describes the current state, older ones are dropped. Returns the
    /// `"{}"` sentinel when nothing was buffered.
    ///
    /// A line that is too long or not UTF-8 is skipped like any other stale
    /// line; it only fails the drain when it is the newest one.
    pub(super) fn drain_to_last(&mut self) -> Result<RawFrame, HumonError<PortError<D>>> {
        let mut last = Ok(RawFrame::default());
        let mut lines: usize = 0;

        while self.bytes_available()? > 0 {
            last = match self.read_line() {
                Ok(line) => {
                    let frame = RawFrame::new(line);
                    info!(line = %frame, "read line");
                    Ok(frame)
                }
                Err(e @ (HumonError::FrameOverflow { .. } | HumonError::InvalidUtf8)) => {
                    warn!(error = %e, "skipped unreadable line");
                    Err(e)
                }
                Err(e) => return Err(e),
            };
            lines += 1;
        }

        if lines > 1 {
            debug!(discarded = lines - 1, "dropped stale lines");
        }
        last
    }
}
