//! HumonSens command-line reader
//!
//! Runs one measurement and prints every field of the reading.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! humonsens --list-ports
//!
//! # Measure with the settings from humonsens.toml
//! humonsens
//!
//! # Override the port and the sampling frequency
//! humonsens --port COM3 --frequency 5000
//! ```
//!
//! Nothing is printed when the measurement failed; the log says why.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;

use humonsens::{adapters, config, logging};

#[derive(Debug, Parser)]
#[command(version, about = "Read one measurement from a HumonSens sensor")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Serial port, overrides `sensor.port`
    #[arg(short, long)]
    port: Option<String>,

    /// Sampling frequency, overrides `sampling.frequency`
    #[arg(short, long)]
    frequency: Option<u32>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_ports {
        return list_ports();
    }

    let config = config::Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    logging::init(&config.logging)?;

    let mut link = config.link_configuration()?;
    if let Some(port) = cli.port {
        link = link.with_port(port);
    }
    let mut request = config.sampling_request()?;
    if let Some(frequency) = cli.frequency {
        request = request.with_frequency(frequency)?;
    }

    tracing::info!(port = link.port(), "HumonSens configured");
    let mut session = adapters::serial_session(link);
    let reading = session.run(&request);

    for (field, value) in reading.fields() {
        match value {
            Value::String(text) => println!("{}: {}", field, text),
            other => println!("{}: {}", field, other),
        }
    }
    Ok(())
}

fn list_ports() -> anyhow::Result<()> {
    let ports = adapters::available_ports().context("listing serial ports")?;

    println!("Available serial ports:");
    if ports.is_empty() {
        println!("  (none)");
    }
    for port in ports {
        print!("  {}", port.port_name);
        match &port.port_type {
            serialport::SerialPortType::UsbPort(info) => {
                println!(" - USB (VID: 0x{:04x}, PID: 0x{:04x})", info.vid, info.pid);
                if let Some(ref manufacturer) = info.manufacturer {
                    println!("      Manufacturer: {}", manufacturer);
                }
                if let Some(ref product) = info.product {
                    println!("      Product: {}", product);
                }
            }
            serialport::SerialPortType::BluetoothPort => println!(" - Bluetooth"),
            serialport::SerialPortType::PciPort => println!(" - PCI"),
            serialport::SerialPortType::Unknown => println!(" - Unknown"),
        }
    }
    Ok(())
}
