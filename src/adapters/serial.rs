// src/adapters/serial.rs

//! Link implementation over the `serialport` crate.

use std::io::{self, Read, Write};

use serialport::{FlowControl, SerialPort, SerialPortInfo};

use super::StdClock;
use crate::common::{
    frame::{DataBits, LinkConfiguration, Parity, StopBits},
    hal_traits::{LinkDriver, LinkPort},
};
use crate::recorder::SensorSession;

/// Session talking to a real serial port.
pub type SerialSession = SensorSession<SerialDriver, StdClock>;

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(stop_bits: StopBits) -> Self {
        match stop_bits {
            StopBits::One => serialport::StopBits::One,
        }
    }
}

impl From<DataBits> for serialport::DataBits {
    fn from(data_bits: DataBits) -> Self {
        match data_bits {
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Opens [`SerialLink`]s.
#[derive(Debug, Default, Copy, Clone)]
pub struct SerialDriver;

impl LinkDriver for SerialDriver {
    type Port = SerialLink;

    fn open(&mut self, config: &LinkConfiguration) -> Result<SerialLink, serialport::Error> {
        let flow_control = if config.software_flow_control() {
            FlowControl::Software
        } else {
            FlowControl::None
        };

        let port = serialport::new(config.port(), config.baud_rate())
            .parity(config.parity().into())
            .stop_bits(config.stop_bits().into())
            .data_bits(config.data_bits().into())
            .flow_control(flow_control)
            .timeout(config.read_timeout())
            .open()?;

        Ok(SerialLink { port })
    }
}

/// An open serial port. Closed when dropped.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

fn would_block(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

impl LinkPort for SerialLink {
    type Error = serialport::Error;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        // Only read what is already buffered so the port timeout never blocks
        // the caller's deadline loop.
        if self.bytes_available().map_err(nb::Error::Other)? == 0 {
            return Err(nb::Error::WouldBlock);
        }

        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) if would_block(&e) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        match self.port.write(&[byte]) {
            Ok(1) => Ok(()),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) if would_block(&e) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        match self.port.flush() {
            Ok(()) => Ok(()),
            Err(e) if would_block(&e) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }
}

/// Builds a session on a real serial port.
pub fn serial_session(config: LinkConfiguration) -> SerialSession {
    SensorSession::new(config, SerialDriver, StdClock)
}

/// Serial ports present on this machine, straight from the platform.
pub fn available_ports() -> Result<Vec<SerialPortInfo>, serialport::Error> {
    serialport::available_ports()
}
