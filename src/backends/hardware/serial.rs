// SPDX-License-Identifier: GPL-3.0-only

//! Relay board over a USB serial port

use super::{ButtonFilter, ButtonSender, HardwareCommand, RelayLink};
use crate::backends::loop_thread::{LoopAction, LoopController};
use crate::errors::HardwareError;
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Read timeout, so the reader thread notices a stop request
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Back-off after an unexpected read error
const READ_ERROR_BACKOFF: Duration = Duration::from_millis(250);

/// Serial connection to the relay board
pub struct SerialLink {
    port_name: String,
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open `port_name` (8N1) and put every relay into its released state.
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self, HardwareError> {
        let port = serialport::new(port_name, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| HardwareError::OpenFailed {
                port: port_name.to_string(),
                reason: e.to_string(),
            })?;

        info!(port = port_name, baud_rate, "Relay board port opened");

        let mut link = Self {
            port_name: port_name.to_string(),
            port,
        };
        if let Err(e) = link.send(HardwareCommand::RelayReset) {
            warn!(error = %e, "Initial relay reset failed");
        }
        Ok(link)
    }

    /// Start the blocking reader thread. Accepted button presses are pushed
    /// into `events`; the thread ends when the receiving side is dropped.
    pub fn spawn_reader(
        &self,
        filter: ButtonFilter,
        events: ButtonSender,
    ) -> Result<LoopController, HardwareError> {
        let mut reader = self
            .port
            .try_clone()
            .map_err(|e| HardwareError::CloneFailed(e.to_string()))?;
        let name = format!("relay-reader:{}", self.port_name);

        Ok(LoopController::start(&name, move || {
            read_button(&mut reader, &filter, &events)
        }))
    }
}

/// Read one byte from the board and queue it if it is a button press.
/// Stops once the tick loop has dropped its end of the queue.
fn read_button(
    reader: &mut impl Read,
    filter: &ButtonFilter,
    events: &ButtonSender,
) -> LoopAction {
    let mut byte = [0u8; 1];
    match reader.read(&mut byte) {
        Ok(0) => LoopAction::Continue,
        Ok(_) => {
            let Some(event) = filter.accept(byte[0], Instant::now()) else {
                return LoopAction::Continue;
            };
            debug!(?event, "Button pressed");
            if events.send(event).is_err() {
                debug!("Button queue closed, stopping reader");
                return LoopAction::Stop;
            }
            LoopAction::Continue
        }
        Err(e) if e.kind() == io::ErrorKind::TimedOut => LoopAction::Continue,
        Err(e) => {
            warn!(error = %e, "Relay board read failed");
            std::thread::sleep(READ_ERROR_BACKOFF);
            LoopAction::Continue
        }
    }
}

impl RelayLink for SerialLink {
    fn send(&mut self, command: HardwareCommand) -> Result<(), HardwareError> {
        debug!(%command, "Relay command");
        self.port
            .write_all(&command.wire_bytes())
            .and_then(|_| self.port.flush())
            .map_err(|e| HardwareError::WriteFailed(e.to_string()))
    }
}
