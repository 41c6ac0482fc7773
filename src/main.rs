// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use photobooth::Config;
use photobooth::backends::HardwareCommand;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photobooth")]
#[command(about = "Unattended photobooth kiosk")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Configuration file (default: ~/.config/photobooth/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Camera device, overrides the configuration
    #[arg(long, global = true)]
    camera: Option<String>,

    /// Relay board serial port, overrides the configuration
    #[arg(long, global = true)]
    serial: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one command to the relay board
    Relay {
        /// focus, lights, shutter or reset
        command: HardwareCommand,
    },

    /// Send a photo to the printer and wait for the transfer
    Print {
        /// Photo to print
        file: PathBuf,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=photobooth=debug, RUST_LOG=info
    // The kiosk screen owns stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(camera) = cli.camera {
        config.camera_device = camera;
    }
    if let Some(serial) = cli.serial {
        config.serial_port = serial;
    }

    match cli.command {
        Some(Commands::Relay { command }) => cli::send_relay(&config, command),
        Some(Commands::Print { file }) => cli::print_file(&config, &file),
        Some(Commands::Config) => cli::show_config(&config),
        None => Ok(photobooth::kiosk::run(&config)?),
    }
}
