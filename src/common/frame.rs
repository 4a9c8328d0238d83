// src/common/frame.rs

use core::time::Duration;

/// Parity setting of the serial frame. The HumonSens only speaks 8N1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Parity {
    #[default]
    None,
}

/// Number of stop bits of the serial frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum StopBits {
    #[default]
    One,
}

/// Number of data bits of the serial frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DataBits {
    #[default]
    Eight,
}

/// Transmission parameters of the link to the sensor.
///
/// Created once when a session is built and never mutated afterwards. Only the
/// port, the baud rate and the read timeout vary between installations; the
/// framing (8N1 with XON/XOFF) is fixed by the device.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LinkConfiguration {
    port: String,
    baud_rate: u32,
    parity: Parity,
    stop_bits: StopBits,
    data_bits: DataBits,
    software_flow_control: bool,
    read_timeout: Duration,
}

impl LinkConfiguration {
    pub fn new(port: impl Into<String>, baud_rate: u32, read_timeout: Duration) -> Self {
        LinkConfiguration {
            port: port.into(),
            baud_rate,
            parity: Parity::None,
            stop_bits: StopBits::One,
            data_bits: DataBits::Eight,
            software_flow_control: true,
            read_timeout,
        }
    }

    /// Returns a copy of this configuration bound to another port.
    pub fn with_port(&self, port: impl Into<String>) -> Self {
        LinkConfiguration {
            port: port.into(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn port(&self) -> &str {
        &self.port
    }

    #[inline]
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    #[inline]
    pub fn parity(&self) -> Parity {
        self.parity
    }

    #[inline]
    pub fn stop_bits(&self) -> StopBits {
        self.stop_bits
    }

    #[inline]
    pub fn data_bits(&self) -> DataBits {
        self.data_bits
    }

    #[inline]
    pub fn software_flow_control(&self) -> bool {
        self.software_flow_control
    }

    #[inline]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}
