// SPDX-License-Identifier: GPL-3.0-only

//! Capture sequencer
//!
//! One state machine, advanced once per render tick by the kiosk loop:
//!
//! ```text
//! Idle ──Shutter──▶ Armed ──3000ms──▶ FOCUS_LOCK ──3500ms──▶ LIGHTS_ON
//!   ▲                 │ Shutter: RELAY_RESET, restart countdown
//!   │                 ▼
//!   └──── RELAY_RESET ◀── settle ◀── SHUTTER_FIRE ◀── capture ◀── flash (4500ms)
//! ```
//!
//! The sequencer owns its state and the snapshot history outright. Button
//! events and print-job notifications arrive through channels drained on
//! the tick; camera frames are handed in by the caller.

pub mod display;
pub mod history;
pub mod print_job;
pub mod state;

pub use display::{DisplayDirective, PrintBadge, countdown_digit, printing_fill};
pub use history::{SnapshotHistory, Slot};
pub use print_job::{PrintJobRunner, PrintNotification};
pub use state::{Phase, SequencerState};

use crate::backends::camera::CameraFrame;
use crate::backends::hardware::{ButtonEvent, HardwareCommand, RelayLink};
use crate::constants::timing;
use crate::pipelines::photo::PhotoPipeline;
use crate::storage::SnapshotStore;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Something that can show the full-white flash frame
///
/// `present_flash` must not return until the frame is on screen.
pub trait FlashSurface {
    fn present_flash(&mut self) -> std::io::Result<()>;
}

/// What happened to the picture when the shutter fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// Photo saved and pushed into the history
    Captured(PathBuf),
    /// No usable frame; relays fired without a snapshot
    Blind,
    /// Frame processed but could not be written
    SaveFailed,
}

/// The kiosk's capture state machine
pub struct CaptureSequencer<L, S> {
    state: SequencerState,
    history: SnapshotHistory,
    printer: PrintJobRunner,
    link: L,
    store: S,
    pipeline: PhotoPipeline,
    relay_settle: Duration,
}

impl<L: RelayLink, S: SnapshotStore> CaptureSequencer<L, S> {
    /// Build an idle sequencer around already-opened collaborators
    pub fn new(
        link: L,
        store: S,
        printer: PrintJobRunner,
        pipeline: PhotoPipeline,
        relay_settle: Duration,
    ) -> Self {
        let (thumb_w, thumb_h) = pipeline.thumbnail_size();
        Self {
            state: SequencerState::default(),
            history: SnapshotHistory::new(thumb_w, thumb_h),
            printer,
            link,
            store,
            pipeline,
            relay_settle,
        }
    }

    /// Advance one tick.
    ///
    /// Order within a tick: remember the frame, handle the event, apply one
    /// print notification, then act on elapsed-time thresholds. Returns the
    /// capture outcome on the tick the shutter fires.
    pub fn tick(
        &mut self,
        now: Instant,
        event: Option<ButtonEvent>,
        frame: Option<CameraFrame>,
        flash: &mut dyn FlashSurface,
    ) -> Option<FireOutcome> {
        if let Some(frame) = frame {
            self.state.store_frame(frame);
        }

        match event {
            Some(ButtonEvent::Shutter) => self.arm(now),
            Some(ButtonEvent::PrintRequest) => {
                self.request_print(now);
            }
            None => {}
        }

        self.printer.poll();

        self.advance(now, flash)
    }

    /// What the renderer should paint for this tick
    pub fn directive(&self, now: Instant, tick: u64) -> DisplayDirective<'_> {
        let countdown = self.state.elapsed(now).and_then(countdown_digit);
        let print_badge = self.history.latest_path().map(|_| {
            if self.printer.in_progress() {
                PrintBadge::Printing {
                    fill: printing_fill(tick),
                }
            } else {
                PrintBadge::Ready
            }
        });

        DisplayDirective {
            countdown,
            print_badge,
            snapshots: self.history.current(),
        }
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn printer(&self) -> &PrintJobRunner {
        &self.printer
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    fn arm(&mut self, now: Instant) {
        if self.state.is_armed() {
            info!("Shutter pressed during countdown, restarting");
            self.emit(HardwareCommand::RelayReset);
        } else {
            info!("Countdown started");
        }
        self.state.arm(now);
    }

    /// Launch a print of slot 0 if there is one and the cooldown allows it
    fn request_print(&mut self, now: Instant) -> bool {
        let Some(path) = self.history.latest_path().map(PathBuf::from) else {
            debug!("Print requested with no snapshot taken");
            return false;
        };
        self.printer.try_launch(&path, now)
    }

    fn advance(&mut self, now: Instant, flash: &mut dyn FlashSurface) -> Option<FireOutcome> {
        let elapsed = self.state.elapsed(now)?;

        // Checked in order so a long stall still emits every command once
        if elapsed >= timing::FOCUS_LOCK_AT && !self.state.focus_locked() {
            self.emit(HardwareCommand::FocusLock);
            self.state.lock_focus();
        }
        if elapsed >= timing::LIGHTS_ON_AT && !self.state.lights_on() {
            self.emit(HardwareCommand::LightsOn);
            self.state.switch_lights_on();
        }
        if elapsed >= timing::FIRE_AT {
            return Some(self.fire(flash));
        }
        None
    }

    fn fire(&mut self, flash: &mut dyn FlashSurface) -> FireOutcome {
        if let Err(e) = flash.present_flash() {
            warn!(error = %e, "Failed to present flash frame");
        }

        let outcome = self.capture();

        self.emit(HardwareCommand::ShutterFire);
        if !self.relay_settle.is_zero() {
            // Stalls the render loop; the flash frame is on screen meanwhile
            std::thread::sleep(self.relay_settle);
        }
        self.emit(HardwareCommand::RelayReset);

        self.state.reset();
        outcome
    }

    fn capture(&mut self) -> FireOutcome {
        let Some(frame) = self.state.last_frame().cloned() else {
            warn!("Shutter fired blind: no frame available");
            return FireOutcome::Blind;
        };

        let photo = match self.pipeline.process(&frame) {
            Ok(photo) => photo,
            Err(e) => {
                warn!(error = %e, "Shutter fired blind: frame unusable");
                return FireOutcome::Blind;
            }
        };

        match self.store.save(&photo.image) {
            Ok(path) => {
                self.history.rotate_in(photo.thumbnail, path.clone());
                FireOutcome::Captured(path)
            }
            Err(e) => {
                error!(error = %e, "Failed to save snapshot");
                FireOutcome::SaveFailed
            }
        }
    }

    fn emit(&mut self, command: HardwareCommand) {
        debug!(%command, "Relay command");
        if let Err(e) = self.link.send(command) {
            warn!(%command, error = %e, "Relay write failed");
        }
    }
}
