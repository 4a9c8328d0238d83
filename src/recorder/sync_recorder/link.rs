// src/recorder/sync_recorder/link.rs

use crate::common::{
    error::HumonError,
    frame::LinkConfiguration,
    hal_traits::{LinkDriver, LinkPort},
};
use tracing::{error, info};

/// Error type of the ports a driver opens.
pub type PortError<D> = <<D as LinkDriver>::Port as LinkPort>::Error;

/// Owns the link configuration, the driver and at most one open port.
///
/// Every access to the port goes through [`LinkManager::port_mut`], which
/// fails with [`HumonError::LinkClosed`] once the link has been closed.
pub struct LinkManager<D>
where
    D: LinkDriver,
{
    config: LinkConfiguration,
    driver: D,
    port: Option<D::Port>,
}

impl<D> LinkManager<D>
where
    D: LinkDriver,
{
    pub fn new(config: LinkConfiguration, driver: D) -> Self {
        LinkManager {
            config,
            driver,
            port: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &LinkConfiguration {
        &self.config
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Opens the link. A port that is still open is closed first.
    pub fn open(&mut self) -> Result<(), HumonError<PortError<D>>> {
        self.close();

        match self.driver.open(&self.config) {
            Ok(port) => {
                self.port = Some(port);
                info!(
                    port = self.config.port(),
                    baud_rate = self.config.baud_rate(),
                    "link established"
                );
                Ok(())
            }
            Err(cause) => {
                error!(port = self.config.port(), error = ?cause, "could not connect to sensor");
                Err(HumonError::Connection {
                    port: self.config.port().to_owned(),
                    cause,
                })
            }
        }
    }

    /// Closes the link. No-op if it is not open.
    pub fn close(&mut self) {
        if let Some(port) = self.port.take() {
            drop(port);
            info!(port = self.config.port(), "link closed");
        }
    }

    /// The open port, or `LinkClosed`.
    pub fn port_mut(&mut self) -> Result<&mut D::Port, HumonError<PortError<D>>> {
        self.port.as_mut().ok_or(HumonError::LinkClosed)
    }
}

impl<D> Drop for LinkManager<D>
where
    D: LinkDriver,
{
    fn drop(&mut self) {
        self.close();
    }
}
