// SPDX-License-Identifier: GPL-3.0-only

//! Camera frame source
//!
//! The kiosk never waits on the camera: each tick polls for the newest
//! decoded frame and carries on with the previous one if nothing new arrived.

pub mod convert;
pub mod types;
pub mod v4l2;

pub use types::{CameraFrame, PixelFormat};
pub use v4l2::V4l2Camera;

/// Non-blocking supplier of camera frames
pub trait FrameSource {
    /// Newest frame received since the last call, dropping any older unread
    /// frames. `None` if nothing new arrived.
    fn latest_frame(&mut self) -> Option<CameraFrame>;
}
