// SPDX-License-Identifier: GPL-3.0-only

//! Photobooth - an unattended photo kiosk
//!
//! A live camera preview, a physical button that starts a timed countdown,
//! relays for focus, fill lights and shutter driven over a serial line, a
//! rolling history of the last four photos and a Bluetooth photo printer.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`sequencer`]: The capture state machine, snapshot history and print jobs
//! - [`backends`]: Webcam, relay board and printer
//! - [`pipelines`]: Frame to photo conversion and JPEG encoding
//! - [`storage`]: Where snapshots are written
//! - [`terminal`]: The kiosk screen
//! - [`kiosk`]: Start-up wiring and the tick loop
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! let config = photobooth::Config::load(None)?;
//! photobooth::kiosk::run(&config)?;
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod kiosk;
pub mod pipelines;
pub mod sequencer;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use sequencer::{CaptureSequencer, DisplayDirective, FireOutcome, FlashSurface};
