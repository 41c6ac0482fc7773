// SPDX-License-Identifier: GPL-3.0-only

//! Photo pipeline
//!
//! ```text
//! CameraFrame → RGB → center crop 3:2 → saved photo (JPEG)
//!                                    ↘ thumbnail for the history strip
//! ```
//!
//! Runs synchronously on the tick loop at fire time; the flash frame is
//! already on screen while it works.

pub mod encoding;
pub mod processing;

pub use encoding::{EncodedImage, encode_jpeg};

use crate::backends::camera::CameraFrame;
use crate::backends::camera::convert::frame_to_rgb;
use crate::constants::geometry;
use crate::errors::PhotoError;
use image::{RgbImage, RgbaImage};
use tracing::debug;

/// Result of running a frame through the pipeline
pub struct CapturedPhoto {
    /// Full-resolution framed photo, ready to be persisted
    pub image: RgbImage,
    /// Thumbnail at history-slot resolution
    pub thumbnail: RgbaImage,
}

/// Frame-to-photo conversion settings
#[derive(Debug, Clone, Copy)]
pub struct PhotoPipeline {
    mirror: bool,
    output_size: (u32, u32),
    thumbnail_size: (u32, u32),
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self {
            mirror: false,
            output_size: (geometry::OUTPUT_WIDTH, geometry::OUTPUT_HEIGHT),
            thumbnail_size: (geometry::SLOT_WIDTH, geometry::SLOT_HEIGHT),
        }
    }
}

impl PhotoPipeline {
    /// Pipeline with the kiosk's output and slot geometry
    pub fn new(mirror: bool) -> Self {
        Self {
            mirror,
            ..Self::default()
        }
    }

    /// Override output and thumbnail sizes
    pub fn with_sizes(mut self, output: (u32, u32), thumbnail: (u32, u32)) -> Self {
        self.output_size = output;
        self.thumbnail_size = thumbnail;
        self
    }

    pub fn thumbnail_size(&self) -> (u32, u32) {
        self.thumbnail_size
    }

    /// Convert, frame and thumbnail a captured camera frame
    pub fn process(&self, frame: &CameraFrame) -> Result<CapturedPhoto, PhotoError> {
        let rgb = frame_to_rgb(frame, self.mirror)?;
        let (out_w, out_h) = self.output_size;
        let image = processing::frame_for_output(&rgb, out_w, out_h);

        let (thumb_w, thumb_h) = self.thumbnail_size;
        let thumbnail = processing::thumbnail(&image, thumb_w, thumb_h);

        debug!(
            source_width = frame.width,
            source_height = frame.height,
            out_w,
            out_h,
            "Photo framed"
        );

        Ok(CapturedPhoto { image, thumbnail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::PixelFormat;

    #[test]
    fn test_process_yuyv_frame() {
        let frame = CameraFrame::new(1280, 720, PixelFormat::YUYV, vec![128u8; 1280 * 720 * 2]);
        let photo = PhotoPipeline::new(false).process(&frame).unwrap();
        assert_eq!(photo.image.dimensions(), (1080, 720));
        assert_eq!(photo.thumbnail.dimensions(), (430, 287));
    }

    #[test]
    fn test_process_empty_frame_fails() {
        let frame = CameraFrame::new(1280, 720, PixelFormat::YUYV, Vec::new());
        assert!(matches!(
            PhotoPipeline::new(false).process(&frame),
            Err(PhotoError::NoFrameAvailable)
        ));
    }
}
