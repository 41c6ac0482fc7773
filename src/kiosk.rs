// SPDX-License-Identifier: GPL-3.0-only

//! Kiosk start-up and the tick loop
//!
//! Every collaborator is opened before the sequencer exists; any failure
//! here aborts start-up. After that the loop never blocks on input: each
//! tick drains one button event, pulls the newest frame, advances the
//! sequencer and redraws.

use crate::backends::camera::{FrameSource, V4l2Camera};
use crate::backends::hardware::serial::SerialLink;
use crate::backends::hardware::{ButtonFilter, ButtonReceiver, ButtonSender, RelayLink};
use crate::backends::printer::ObexFtpTransport;
use crate::config::Config;
use crate::constants::timing::TICK_INTERVAL;
use crate::errors::{AppError, AppResult};
use crate::pipelines::photo::PhotoPipeline;
use crate::sequencer::{CaptureSequencer, FireOutcome, FlashSurface, PrintJobRunner};
use crate::storage::{DirectoryStore, SnapshotStore};
use crate::terminal::{KioskInput, TerminalRenderer};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Run the kiosk until the operator quits
pub fn run(config: &Config) -> AppResult<()> {
    let started_at = Instant::now();
    info!(?config, "Starting photobooth");

    // Print jobs run on this runtime's blocking pool
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .thread_name("photobooth-print")
        .build()
        .map_err(|e| AppError::Other(format!("print runtime: {}", e)))?;

    let mut camera = V4l2Camera::open(
        &config.camera_device,
        config.capture_width,
        config.capture_height,
    )?;
    let link = SerialLink::open(&config.serial_port, config.baud_rate)?;
    let store = DirectoryStore::open(&config.snapshot_dir, config.jpeg_quality())?;

    let (button_tx, mut button_rx): (ButtonSender, ButtonReceiver) = mpsc::unbounded_channel();
    let _reader = link.spawn_reader(
        ButtonFilter::new(started_at, config.startup_grace()),
        button_tx.clone(),
    )?;

    let transport = ObexFtpTransport::new(
        &config.obexftp_path,
        &config.printer_address,
        config.printer_channel,
    );
    let printer = PrintJobRunner::new(Arc::new(transport), runtime.handle().clone());

    let mut sequencer = CaptureSequencer::new(
        link,
        store,
        printer,
        PhotoPipeline::new(config.mirror_preview),
        config.relay_settle(),
    );

    let mut renderer = TerminalRenderer::enter(config.mirror_preview)
        .map_err(terminal_error)?;
    info!("Kiosk ready");

    let mut tick: u64 = 0;
    loop {
        let now = Instant::now();
        let outcome = step(&mut sequencer, &mut button_rx, &mut camera, &mut renderer, now);
        if let Some(frame) = sequencer.state().last_frame() {
            renderer.update_preview(frame);
        }

        match outcome {
            Some(FireOutcome::Captured(path)) => {
                renderer.set_status(format!("Saved {}", path.display()));
            }
            Some(FireOutcome::Blind) => renderer.set_status("No camera frame, photo skipped"),
            Some(FireOutcome::SaveFailed) => renderer.set_status("Could not save photo"),
            None => {}
        }

        renderer
            .draw(&sequencer.directive(now, tick))
            .map_err(terminal_error)?;
        tick = tick.wrapping_add(1);

        match renderer.poll_input(TICK_INTERVAL).map_err(terminal_error)? {
            Some(KioskInput::Quit) => break,
            Some(KioskInput::Press(event)) => {
                debug!(?event, "Key press injected as button");
                // Same queue as the hardware buttons, one event per tick
                if button_tx.send(event).is_err() {
                    warn!(?event, "Button queue closed, key press dropped");
                }
            }
            None => {}
        }
    }

    renderer.restore().map_err(terminal_error)?;
    info!("Photobooth stopped");
    Ok(())
}

/// One pass of the tick loop, minus drawing: take the oldest queued button
/// event (at most one), pull the newest camera frame and advance the
/// sequencer. Later events stay queued for the following ticks.
pub fn step<L: RelayLink, S: SnapshotStore>(
    sequencer: &mut CaptureSequencer<L, S>,
    buttons: &mut ButtonReceiver,
    camera: &mut impl FrameSource,
    flash: &mut impl FlashSurface,
    now: Instant,
) -> Option<FireOutcome> {
    let event = buttons.try_recv().ok();
    let frame = camera.latest_frame();
    sequencer.tick(now, event, frame, flash)
}

fn terminal_error(e: std::io::Error) -> AppError {
    AppError::Other(format!("terminal: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{CameraFrame, PixelFormat};
    use crate::backends::hardware::{ButtonEvent, HardwareCommand};
    use crate::backends::printer::PrintTransport;
    use crate::errors::{HardwareError, PhotoError};
    use image::RgbImage;
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingLink(Vec<HardwareCommand>);

    impl RelayLink for RecordingLink {
        fn send(&mut self, command: HardwareCommand) -> Result<(), HardwareError> {
            self.0.push(command);
            Ok(())
        }
    }

    struct NoStore;

    impl SnapshotStore for NoStore {
        fn save(&mut self, _image: &RgbImage) -> Result<PathBuf, PhotoError> {
            Err(PhotoError::SaveFailed("read-only".into()))
        }
    }

    struct NullTransport;

    impl PrintTransport for NullTransport {
        fn transfer(&self, _path: &Path) {}
    }

    struct NoFlash;

    impl FlashSurface for NoFlash {
        fn present_flash(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Frames delivered since the last poll, newest last
    #[derive(Default)]
    struct QueuedFrames(VecDeque<CameraFrame>);

    impl FrameSource for QueuedFrames {
        fn latest_frame(&mut self) -> Option<CameraFrame> {
            self.0.drain(..).last()
        }
    }

    fn sequencer(runtime: &tokio::runtime::Runtime) -> CaptureSequencer<RecordingLink, NoStore> {
        CaptureSequencer::new(
            RecordingLink::default(),
            NoStore,
            PrintJobRunner::new(Arc::new(NullTransport), runtime.handle().clone()),
            PhotoPipeline::new(false).with_sizes((30, 20), (15, 10)),
            Duration::ZERO,
        )
    }

    fn solid(width: u32, value: u8) -> CameraFrame {
        CameraFrame::new(width, 4, PixelFormat::RGB24, vec![value; (width * 4 * 3) as usize])
    }

    #[test]
    fn test_one_button_event_per_tick_oldest_first() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut seq = sequencer(&rt);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut camera = QueuedFrames::default();
        let t0 = Instant::now();

        tx.send(ButtonEvent::PrintRequest).unwrap();
        tx.send(ButtonEvent::Shutter).unwrap();
        tx.send(ButtonEvent::Shutter).unwrap();

        // Print with nothing taken yet is ignored; the shutter is still queued
        step(&mut seq, &mut rx, &mut camera, &mut NoFlash, t0);
        assert!(!seq.state().is_armed());

        let t1 = t0 + Duration::from_millis(33);
        step(&mut seq, &mut rx, &mut camera, &mut NoFlash, t1);
        assert_eq!(seq.state().armed_at(), Some(t1));
        assert!(seq.link().0.is_empty());

        let t2 = t1 + Duration::from_millis(33);
        step(&mut seq, &mut rx, &mut camera, &mut NoFlash, t2);
        assert_eq!(seq.state().armed_at(), Some(t2));
        assert_eq!(seq.link().0, [HardwareCommand::RelayReset]);

        // Queue drained
        step(&mut seq, &mut rx, &mut camera, &mut NoFlash, t2 + Duration::from_millis(33));
        assert_eq!(seq.state().armed_at(), Some(t2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_only_newest_frame_reaches_sequencer() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut seq = sequencer(&rt);
        let (_tx, mut rx) = mpsc::unbounded_channel();
        let mut camera = QueuedFrames::default();
        let t0 = Instant::now();

        camera.0.extend([solid(8, 10), solid(12, 20), solid(16, 30)]);
        step(&mut seq, &mut rx, &mut camera, &mut NoFlash, t0);

        let last = seq.state().last_frame().unwrap();
        assert_eq!(last.width, 16);
        assert_eq!(last.data[0], 30);
        assert!(camera.0.is_empty());

        // Nothing new: the previous frame is kept
        step(&mut seq, &mut rx, &mut camera, &mut NoFlash, t0 + Duration::from_millis(33));
        assert_eq!(seq.state().last_frame().unwrap().width, 16);
    }
}
