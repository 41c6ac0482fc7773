// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture sequencer, driven through in-memory
//! stand-ins for the relay board, the snapshot store, the screen and the
//! printer.

use photobooth::backends::{
    ButtonEvent, CameraFrame, HardwareCommand, PixelFormat, PrintTransport, RelayLink,
};
use photobooth::errors::{HardwareError, PhotoError};
use photobooth::pipelines::photo::PhotoPipeline;
use photobooth::sequencer::{
    CaptureSequencer, FireOutcome, FlashSurface, Phase, PrintBadge, PrintJobRunner,
};
use photobooth::storage::SnapshotStore;
use image::RgbImage;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex, mpsc};
use std::time::{Duration, Instant};

/// Everything the outside world saw, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seen {
    Flash,
    Relay(HardwareCommand),
}

type Log = Rc<RefCell<Vec<Seen>>>;

struct LogLink(Log);

impl RelayLink for LogLink {
    fn send(&mut self, command: HardwareCommand) -> Result<(), HardwareError> {
        self.0.borrow_mut().push(Seen::Relay(command));
        Ok(())
    }
}

struct LogFlash(Log);

impl FlashSurface for LogFlash {
    fn present_flash(&mut self) -> std::io::Result<()> {
        self.0.borrow_mut().push(Seen::Flash);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryStore {
    count: usize,
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, _image: &RgbImage) -> Result<PathBuf, PhotoError> {
        self.count += 1;
        Ok(PathBuf::from(format!("snaps/{}.jpg", self.count)))
    }
}

/// Transfer that blocks until the test releases it
struct GatedTransport {
    sent: Mutex<Vec<PathBuf>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl PrintTransport for GatedTransport {
    fn transfer(&self, path: &Path) {
        self.sent.lock().unwrap().push(path.to_path_buf());
        let _ = self.release.lock().unwrap().recv();
    }
}

struct Booth {
    _runtime: tokio::runtime::Runtime,
    sequencer: CaptureSequencer<LogLink, MemoryStore>,
    flash: LogFlash,
    log: Log,
    transport: Arc<GatedTransport>,
    release: mpsc::Sender<()>,
}

impl Booth {
    fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let log: Log = Rc::default();
        let (release, gate) = mpsc::channel();
        let transport = Arc::new(GatedTransport {
            sent: Mutex::new(Vec::new()),
            release: Mutex::new(gate),
        });
        let printer = PrintJobRunner::new(transport.clone(), runtime.handle().clone());

        let sequencer = CaptureSequencer::new(
            LogLink(log.clone()),
            MemoryStore::default(),
            printer,
            PhotoPipeline::new(false).with_sizes((60, 40), (15, 10)),
            Duration::ZERO,
        );

        Self {
            _runtime: runtime,
            sequencer,
            flash: LogFlash(log.clone()),
            log,
            transport,
            release,
        }
    }

    fn tick(&mut self, now: Instant, event: Option<ButtonEvent>) -> Option<FireOutcome> {
        self.sequencer.tick(now, event, Some(frame()), &mut self.flash)
    }

    fn seen(&self) -> Vec<Seen> {
        self.log.borrow().clone()
    }

    /// Run one full countdown starting at `t0`
    fn take_photo(&mut self, t0: Instant) -> Option<FireOutcome> {
        self.tick(t0, Some(ButtonEvent::Shutter));
        self.tick(t0 + ms(3100), None);
        self.tick(t0 + ms(3600), None);
        self.tick(t0 + ms(4600), None)
    }

    /// Tick at `now` until the print badge matches, or give up
    fn wait_for_badge(&mut self, now: Instant, want: fn(Option<PrintBadge>) -> bool) -> bool {
        for tick in 0..1000u64 {
            self.tick(now, None);
            if want(self.sequencer.directive(now, tick).print_badge) {
                return true;
            }
            std::thread::sleep(ms(2));
        }
        false
    }
}

fn frame() -> CameraFrame {
    CameraFrame::new(128, 72, PixelFormat::YUYV, vec![128u8; 128 * 72 * 2])
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_end_to_end_timeline() {
    use photobooth::backends::HardwareCommand::{FocusLock, LightsOn, RelayReset, ShutterFire};

    let mut booth = Booth::new();
    let t0 = Instant::now();

    booth.tick(t0, Some(ButtonEvent::Shutter));

    booth.tick(t0 + ms(100), None);
    assert_eq!(booth.sequencer.directive(t0 + ms(100), 0).countdown, Some(3));
    assert!(booth.seen().is_empty());

    booth.tick(t0 + ms(1600), None);
    assert_eq!(booth.sequencer.directive(t0 + ms(1600), 0).countdown, Some(2));
    assert!(booth.seen().is_empty());

    booth.tick(t0 + ms(3100), None);
    assert_eq!(booth.sequencer.directive(t0 + ms(3100), 0).countdown, Some(1));
    assert_eq!(booth.seen(), [Seen::Relay(FocusLock)]);

    booth.tick(t0 + ms(3600), None);
    assert_eq!(booth.seen(), [Seen::Relay(FocusLock), Seen::Relay(LightsOn)]);

    let outcome = booth.tick(t0 + ms(4600), None);
    assert_eq!(
        outcome,
        Some(FireOutcome::Captured(PathBuf::from("snaps/1.jpg")))
    );
    assert_eq!(
        booth.seen(),
        [
            Seen::Relay(FocusLock),
            Seen::Relay(LightsOn),
            Seen::Flash,
            Seen::Relay(ShutterFire),
            Seen::Relay(RelayReset),
        ]
    );

    let t_end = t0 + ms(4800);
    assert!(booth.tick(t_end, None).is_none());
    assert_eq!(booth.sequencer.state().phase(t_end), Phase::Idle);
    let directive = booth.sequencer.directive(t_end, 0);
    assert_eq!(directive.countdown, None);
    assert_eq!(directive.print_badge, Some(PrintBadge::Ready));
    assert_eq!(booth.seen().len(), 5);
}

#[test]
fn test_history_rotates_most_recent_first() {
    let mut booth = Booth::new();
    let mut t = Instant::now();

    for _ in 0..5 {
        assert!(matches!(booth.take_photo(t), Some(FireOutcome::Captured(_))));
        t += ms(10_000);
    }

    let paths: Vec<PathBuf> = booth
        .sequencer
        .history()
        .current()
        .iter()
        .map(|slot| slot.source_path.clone().unwrap())
        .collect();
    assert_eq!(
        paths,
        ["snaps/5.jpg", "snaps/4.jpg", "snaps/3.jpg", "snaps/2.jpg"].map(PathBuf::from)
    );
    for slot in booth.sequencer.history().current() {
        assert_eq!(slot.thumbnail.dimensions(), (15, 10));
        assert_eq!(slot.thumbnail.get_pixel(0, 0).0[3], 255);
    }

    // Every cycle emitted the full sequence, nothing more
    assert_eq!(booth.seen().len(), 5 * 5);
}

#[test]
fn test_print_lifecycle_and_cooldown() {
    let mut booth = Booth::new();
    let t0 = Instant::now();

    // Nothing to print yet
    booth.tick(t0, Some(ButtonEvent::PrintRequest));
    assert!(booth.sequencer.printer().cooldown_until().is_none());

    booth.take_photo(t0);
    let t1 = t0 + ms(5000);
    booth.tick(t1, Some(ButtonEvent::PrintRequest));
    assert_eq!(
        booth.sequencer.printer().cooldown_until(),
        Some(t1 + Duration::from_secs(30))
    );

    assert!(booth.wait_for_badge(t1, |badge| matches!(
        badge,
        Some(PrintBadge::Printing { .. })
    )));
    assert!(booth.sequencer.printer().in_progress());

    // Repeated presses inside the cooldown do not start another job
    booth.tick(t1 + ms(500), Some(ButtonEvent::PrintRequest));
    booth.tick(t1 + ms(29_000), Some(ButtonEvent::PrintRequest));

    booth.release.send(()).unwrap();
    assert!(booth.wait_for_badge(t1, |badge| badge == Some(PrintBadge::Ready)));
    assert!(!booth.sequencer.printer().in_progress());
    assert_eq!(
        *booth.transport.sent.lock().unwrap(),
        [PathBuf::from("snaps/1.jpg")]
    );

    // After the cooldown a new job is accepted
    let t2 = t1 + ms(30_001);
    booth.tick(t2, Some(ButtonEvent::PrintRequest));
    assert_eq!(
        booth.sequencer.printer().cooldown_until(),
        Some(t2 + Duration::from_secs(30))
    );
    booth.release.send(()).unwrap();
}

#[test]
fn test_printing_badge_colour_follows_tick() {
    let mut booth = Booth::new();
    let t0 = Instant::now();
    booth.take_photo(t0);

    let t1 = t0 + ms(5000);
    booth.tick(t1, Some(ButtonEvent::PrintRequest));
    assert!(booth.wait_for_badge(t1, |badge| matches!(
        badge,
        Some(PrintBadge::Printing { .. })
    )));

    let a = booth.sequencer.directive(t1, 1).print_badge;
    let b = booth.sequencer.directive(t1, 1).print_badge;
    let c = booth.sequencer.directive(t1, 2).print_badge;
    assert_eq!(a, b);
    assert_ne!(a, c);

    booth.release.send(()).unwrap();
}
