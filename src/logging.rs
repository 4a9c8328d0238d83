// src/logging.rs

//! Process-wide log output for the command-line tool.
//!
//! The library only emits `tracing` events; this installs the subscriber
//! that prints them on stdout and, if configured, appends them to a file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingSection};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("could not open log file {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("logging already initialised: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global subscriber. Call once at process start.
pub fn init(config: &LoggingSection) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.log_level)?;

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;
            Some(format_layer(config.log_format, Mutex::new(file), false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(format_layer(config.log_format, std::io::stdout, true))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn format_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}
