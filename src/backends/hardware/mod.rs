// SPDX-License-Identifier: GPL-3.0-only

//! Relay board link
//!
//! The board is a microcontroller on a serial line. Outbound it takes one
//! ASCII command per line to drive the focus, light and shutter relays;
//! inbound it reports button presses as single bytes.

pub mod serial;

pub use serial::SerialLink;

use crate::constants::protocol;
use crate::errors::HardwareError;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

/// Commands understood by the relay board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareCommand {
    /// Half-press: lock camera focus
    FocusLock,
    /// Switch the fill lights on
    LightsOn,
    /// Full press: release the shutter
    ShutterFire,
    /// Release every relay
    RelayReset,
}

impl HardwareCommand {
    /// Command byte on the wire
    pub fn byte(&self) -> u8 {
        match self {
            HardwareCommand::FocusLock => protocol::FOCUS_LOCK,
            HardwareCommand::LightsOn => protocol::LIGHTS_ON,
            HardwareCommand::ShutterFire => protocol::SHUTTER_FIRE,
            HardwareCommand::RelayReset => protocol::RELAY_RESET,
        }
    }

    /// Full line as written to the port: command byte followed by CR LF
    pub fn wire_bytes(&self) -> [u8; 3] {
        let [cr, lf] = [protocol::LINE_TERMINATOR[0], protocol::LINE_TERMINATOR[1]];
        [self.byte(), cr, lf]
    }
}

impl fmt::Display for HardwareCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareCommand::FocusLock => write!(f, "focus"),
            HardwareCommand::LightsOn => write!(f, "lights"),
            HardwareCommand::ShutterFire => write!(f, "shutter"),
            HardwareCommand::RelayReset => write!(f, "reset"),
        }
    }
}

impl FromStr for HardwareCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" | "a" => Ok(HardwareCommand::FocusLock),
            "lights" | "b" => Ok(HardwareCommand::LightsOn),
            "shutter" | "c" => Ok(HardwareCommand::ShutterFire),
            "reset" | "r" => Ok(HardwareCommand::RelayReset),
            other => Err(format!(
                "unknown relay command '{}' (expected focus, lights, shutter or reset)",
                other
            )),
        }
    }
}

/// A button press reported by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Start (or restart) the countdown
    Shutter,
    /// Print the most recent snapshot
    PrintRequest,
}

impl ButtonEvent {
    /// Decode a raw byte. Noise and unknown buttons yield `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte <= protocol::NOISE_THRESHOLD {
            return None;
        }
        match byte {
            protocol::BUTTON_SHUTTER => Some(ButtonEvent::Shutter),
            protocol::BUTTON_PRINT => Some(ButtonEvent::PrintRequest),
            _ => None,
        }
    }
}

/// Rejects everything during the start-up grace window, when the board is
/// still settling after reset, then decodes bytes with [`ButtonEvent::from_byte`].
#[derive(Debug, Clone, Copy)]
pub struct ButtonFilter {
    started_at: Instant,
    grace: Duration,
}

impl ButtonFilter {
    pub fn new(started_at: Instant, grace: Duration) -> Self {
        Self { started_at, grace }
    }

    /// Decide whether `byte`, read at `now`, is a button event
    pub fn accept(&self, byte: u8, now: Instant) -> Option<ButtonEvent> {
        if now.saturating_duration_since(self.started_at) < self.grace {
            debug!(byte, "Ignoring button byte during start-up grace");
            return None;
        }
        let event = ButtonEvent::from_byte(byte);
        if event.is_none() {
            debug!(byte, "Ignoring unknown button byte");
        }
        event
    }
}

/// Queue feeding button events to the tick loop
pub type ButtonSender = mpsc::UnboundedSender<ButtonEvent>;

/// Tick-loop end of the button queue
pub type ButtonReceiver = mpsc::UnboundedReceiver<ButtonEvent>;

/// Outbound side of the relay board
///
/// Writes are attempted once. Callers log failures and move on; the board
/// is best-effort and nothing is retried.
pub trait RelayLink {
    fn send(&mut self, command: HardwareCommand) -> Result<(), HardwareError>;
}

impl<L: RelayLink + ?Sized> RelayLink for Box<L> {
    fn send(&mut self, command: HardwareCommand) -> Result<(), HardwareError> {
        (**self).send(command)
    }
}
