// SPDX-License-Identifier: GPL-3.0-only

//! Device backends
//!
//! Thin wrappers around the devices the kiosk talks to: the webcam, the
//! relay board and the photo printer. The capture sequencer only sees them
//! through the traits exported here.

pub mod camera;
pub mod hardware;
pub mod loop_thread;
pub mod printer;

pub use camera::{CameraFrame, FrameSource, PixelFormat};
pub use hardware::{ButtonEvent, ButtonFilter, HardwareCommand, RelayLink};
pub use printer::PrintTransport;
