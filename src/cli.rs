// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for bench testing the kiosk hardware
//!
//! This module provides command-line functionality for:
//! - Driving a single relay
//! - Sending a photo to the printer
//! - Showing the effective configuration

use photobooth::Config;
use photobooth::backends::hardware::SerialLink;
use photobooth::backends::printer::{ObexFtpTransport, PrintTransport};
use photobooth::backends::{HardwareCommand, RelayLink};
use std::path::Path;

/// Send one command to the relay board
pub fn send_relay(
    config: &Config,
    command: HardwareCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut link = SerialLink::open(&config.serial_port, config.baud_rate)?;
    link.send(command)?;
    println!("Sent {} to {}", command, config.serial_port);
    Ok(())
}

/// Push `file` to the configured printer and wait for obexftp to exit
pub fn print_file(config: &Config, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.is_file() {
        return Err(format!("No such file: {}", file.display()).into());
    }

    let transport = ObexFtpTransport::new(
        &config.obexftp_path,
        &config.printer_address,
        config.printer_channel,
    );
    println!("Sending {} to {}...", file.display(), config.printer_address);
    transport.transfer(file);
    println!("Transfer finished");
    Ok(())
}

/// Print the configuration the kiosk would run with
pub fn show_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
