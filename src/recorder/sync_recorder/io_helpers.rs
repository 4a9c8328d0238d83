// src/recorder/sync_recorder/io_helpers.rs

use super::{link::PortError, SensorSession};
use crate::common::{
    command::encode_frequency_command,
    error::HumonError,
    hal_traits::{LinkClock, LinkDriver, LinkPort},
    timing,
};
use core::fmt::Debug;
use core::time::Duration;
use nb::Result as NbResult;
use tracing::debug;

// Implementation block for I/O related helpers
impl<D, C> SensorSession<D, C>
where
    D: LinkDriver,
    C: LinkClock,
{
    /// Executes a non-blocking I/O operation (`f`) on the open port repeatedly
    /// until it stops returning `WouldBlock`, or fails with `Timeout` once
    /// `deadline` has passed.
    pub(super) fn execute_blocking_io_until<FN, T>(
        &mut self,
        deadline: C::Instant,
        mut f: FN,
    ) -> Result<T, HumonError<PortError<D>>>
    where
        FN: FnMut(&mut D::Port) -> NbResult<T, PortError<D>>,
    {
        loop {
            let port = self.link.port_mut()?;
            match f(port) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.clock.now() >= deadline {
                        return Err(HumonError::Timeout);
                    }
                    self.clock.delay(timing::IO_RETRY_INTERVAL);
                }
                Err(nb::Error::Other(e)) => return Err(HumonError::Io(e)),
            }
        }
    }

    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        f: FN,
    ) -> Result<T, HumonError<PortError<D>>>
    where
        FN: FnMut(&mut D::Port) -> NbResult<T, PortError<D>>,
    {
        let deadline = self.clock.now() + timeout;
        self.execute_blocking_io_until(deadline, f)
    }

    /// Number of bytes waiting in the port's input buffer.
    pub(super) fn bytes_available(&mut self) -> Result<usize, HumonError<PortError<D>>> {
        self.link
            .port_mut()?
            .bytes_available()
            .map_err(HumonError::Io)
    }

    /// Encodes and transmits the set-frequency command. No acknowledgement
    /// is awaited.
    pub(super) fn send_frequency(&mut self, frequency: u32) -> Result<(), HumonError<PortError<D>>> {
        let command =
            encode_frequency_command(frequency).map_err(|_| HumonError::CommandFormat)?;
        debug!(command = command.trim_end(), "sending command");

        for byte in command.as_bytes() {
            self.execute_blocking_io_with_timeout(timing::WRITE_BYTE_TIMEOUT, |port| {
                port.write_byte(*byte)
            })
            .map_err(as_write_error)?;
        }

        self.execute_blocking_io_with_timeout(timing::FLUSH_TIMEOUT, |port| port.flush())
            .map_err(as_write_error)?;

        Ok(())
    }

    /// Reads one line, terminator included.
    ///
    /// The whole line shares the configured read timeout. If it runs out after
    /// some bytes arrived, the partial line is returned, the way a timed-out
    /// `readline` behaves; if nothing arrived the result is `Timeout`.
    pub(super) fn read_line(&mut self) -> Result<String, HumonError<PortError<D>>> {
        let deadline = self.clock.now() + self.link.config().read_timeout();
        let mut line: Vec<u8> = Vec::with_capacity(64);

        loop {
            if line.len() >= timing::MAX_FRAME_LEN {
                let skipped = self.skip_rest_of_line(deadline)?;
                return Err(HumonError::FrameOverflow {
                    needed: line.len() + skipped,
                    got: timing::MAX_FRAME_LEN,
                });
            }

            match self.execute_blocking_io_until(deadline, |port| port.read_byte()) {
                Ok(byte) => {
                    line.push(byte);
                    if byte == b'\n' {
                        break;
                    }
                }
                Err(HumonError::Timeout) if !line.is_empty() => {
                    debug!(bytes = line.len(), "line ended by read timeout");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        String::from_utf8(line).map_err(|_| HumonError::InvalidUtf8)
    }

    /// Consumes bytes up to and including the next `\n`, so the following
    /// read starts on a fresh line. Stops quietly at `deadline`. Returns the
    /// number of bytes consumed.
    fn skip_rest_of_line(&mut self, deadline: C::Instant) -> Result<usize, HumonError<PortError<D>>> {
        let mut skipped = 0;
        loop {
            match self.execute_blocking_io_until(deadline, |port| port.read_byte()) {
                Ok(byte) => {
                    skipped += 1;
                    if byte == b'\n' {
                        return Ok(skipped);
                    }
                }
                Err(HumonError::Timeout) => return Ok(skipped),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Transport errors raised while sending are write errors.
fn as_write_error<E: Debug>(e: HumonError<E>) -> HumonError<E> {
    match e {
        HumonError::Io(cause) => HumonError::Write(cause),
        other => other,
    }
}
