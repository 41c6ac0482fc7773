// SPDX-License-Identifier: GPL-3.0-only

//! Photo printer transport
//!
//! The printer accepts files over Bluetooth OBEX object push. The transfer
//! is opaque: only "it finished" is observed, not whether it succeeded.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Something that can push a file to the printer.
///
/// Called on a blocking worker thread, so implementations may block for
/// as long as the transfer takes.
pub trait PrintTransport: Send + Sync + 'static {
    fn transfer(&self, path: &Path);
}

/// Pushes files with the `obexftp` command-line tool
#[derive(Debug, Clone)]
pub struct ObexFtpTransport {
    program: PathBuf,
    address: String,
    channel: u8,
}

impl ObexFtpTransport {
    pub fn new(program: impl Into<PathBuf>, address: impl Into<String>, channel: u8) -> Self {
        Self {
            program: program.into(),
            address: address.into(),
            channel,
        }
    }

    /// Build the obexftp invocation for `path`
    pub fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["--nopath", "--noconn", "--uuid", "none", "--bluetooth"])
            .arg(&self.address)
            .arg("--channel")
            .arg(self.channel.to_string())
            .arg("-p")
            .arg(path);
        cmd
    }
}

impl PrintTransport for ObexFtpTransport {
    fn transfer(&self, path: &Path) {
        info!(path = %path.display(), printer = %self.address, "Sending photo to printer");
        match self.command(path).output() {
            Ok(output) if output.status.success() => {
                info!(path = %path.display(), "Print transfer finished");
            }
            Ok(output) => {
                warn!(
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "Print transfer exited with an error"
                );
            }
            Err(e) => {
                warn!(program = %self.program.display(), error = %e, "Failed to run obexftp");
            }
        }
    }
}
