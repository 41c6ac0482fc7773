// SPDX-License-Identifier: GPL-3.0-only

//! Background print jobs
//!
//! A launch only checks the cooldown and hands the transfer to tokio's
//! blocking pool. The job reports back through a channel the tick loop
//! drains; `in_progress` is never set directly.
//!
//! There is no lock against overlapping transfers. The 30 s cooldown keeps
//! them apart in practice, and is armed at launch time so rapid presses
//! cannot slip in before the job reports that it started.

use crate::backends::printer::PrintTransport;
use crate::constants::timing::PRINT_COOLDOWN;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Lifecycle notifications sent by a running print job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintNotification {
    Started,
    Finished,
}

/// Launches print transfers and tracks whether one is running
pub struct PrintJobRunner {
    transport: Arc<dyn PrintTransport>,
    runtime: Handle,
    cooldown_until: Option<Instant>,
    in_progress: bool,
    sender: mpsc::UnboundedSender<PrintNotification>,
    receiver: mpsc::UnboundedReceiver<PrintNotification>,
}

impl PrintJobRunner {
    /// Jobs are spawned on `runtime`'s blocking pool
    pub fn new(transport: Arc<dyn PrintTransport>, runtime: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            transport,
            runtime,
            cooldown_until: None,
            in_progress: false,
            sender,
            receiver,
        }
    }

    /// Start printing `path` unless the cooldown from the previous launch is
    /// still running. Returns whether a job was launched.
    pub fn try_launch(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(until) = self.cooldown_until
            && now <= until
        {
            debug!(
                remaining_ms = (until - now).as_millis() as u64,
                "Print request ignored during cooldown"
            );
            return false;
        }

        self.cooldown_until = Some(now + PRINT_COOLDOWN);
        info!(path = %path.display(), "Launching print job");

        let transport = Arc::clone(&self.transport);
        let sender = self.sender.clone();
        let path: PathBuf = path.to_path_buf();
        self.runtime.spawn_blocking(move || {
            let _ = sender.send(PrintNotification::Started);
            transport.transfer(&path);
            let _ = sender.send(PrintNotification::Finished);
        });
        true
    }

    /// Apply at most one pending job notification. Never blocks.
    pub fn poll(&mut self) -> Option<PrintNotification> {
        let notification = self.receiver.try_recv().ok()?;
        self.in_progress = notification == PrintNotification::Started;
        match notification {
            PrintNotification::Started => info!("Printing"),
            PrintNotification::Finished => info!("Print job done"),
        }
        Some(notification)
    }

    /// Whether a job has reported start but not yet finish
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// End of the current cooldown, if a job was ever launched
    pub fn cooldown_until(&self) -> Option<Instant> {
        self.cooldown_until
    }
}
