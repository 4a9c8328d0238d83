// src/config.rs

//! Configuration file loading.
//!
//! ```toml
//! [sensor]
//! port = "/dev/ttyUSB0"
//! baudrate = 115200
//! timeout = 1.0
//!
//! [logging]
//! log_file = "humonsens.log"
//! log_level = "info"
//! log_format = "full"
//!
//! [sampling]
//! frequency = 10000
//! wait_period = 0.6
//! max_checks = 10
//! ```
//!
//! Only `[sensor]` is required.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::common::{timing, LinkConfiguration, SamplingRequest};

/// Path looked up when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "humonsens.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub sensor: SensorSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub sampling: SamplingSection,
}

/// `[sensor]`: where and how to reach the device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorSection {
    pub port: String,
    pub baudrate: u32,
    /// Read timeout in seconds.
    pub timeout: f64,
}

/// Line layout of log output.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Timestamp, level, span context, message and fields.
    #[default]
    Full,
    /// Like `Full`, on a shorter line.
    Compact,
    /// One JSON object per event.
    Json,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Append-only log file, in addition to the console.
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `humonsens=debug`.
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            log_file: None,
            log_level: "info".to_owned(),
            log_format: LogFormat::default(),
        }
    }
}

/// `[sampling]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingSection {
    pub frequency: u32,
    /// Seconds between readiness checks.
    pub wait_period: f64,
    pub max_checks: u32,
}

impl Default for SamplingSection {
    fn default() -> Self {
        SamplingSection {
            frequency: timing::DEFAULT_FREQUENCY,
            wait_period: timing::DEFAULT_WAIT_PERIOD.as_secs_f64(),
            max_checks: timing::DEFAULT_MAX_CHECKS,
        }
    }
}

fn seconds(key: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        // Validate eagerly so a bad file fails at startup, not mid-measurement.
        config.link_configuration()?;
        config.sampling_request()?;
        Ok(config)
    }

    pub fn link_configuration(&self) -> Result<LinkConfiguration, ConfigError> {
        if self.sensor.baudrate == 0 {
            return Err(ConfigError::Invalid {
                key: "sensor.baudrate",
                reason: "must be positive".to_owned(),
            });
        }
        let timeout = seconds("sensor.timeout", self.sensor.timeout)?;
        Ok(LinkConfiguration::new(
            self.sensor.port.clone(),
            self.sensor.baudrate,
            timeout,
        ))
    }

    pub fn sampling_request(&self) -> Result<SamplingRequest, ConfigError> {
        let wait_period = seconds("sampling.wait_period", self.sampling.wait_period)?;
        SamplingRequest::new(self.sampling.frequency, wait_period, self.sampling.max_checks)
            .map_err(|e| ConfigError::Invalid {
                key: "sampling",
                reason: e.to_string(),
            })
    }
}
