// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera frames

use std::sync::Arc;

/// Pixel format for camera frames
///
/// The webcam is always negotiated to YUYV; RGB24 covers frames built in
/// memory. Both are sampled to RGB on the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    RGB24,
    /// YUYV - Packed 4:2:2 (Y0 U Y1 V interleaved)
    /// Common raw format from webcam sensors
    YUYV,
}

impl PixelFormat {
    /// Bytes per pixel in the packed layout
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            Self::RGB24 => 3,
            Self::YUYV => 2,
        }
    }
}

/// A decoded camera frame
///
/// The pixel data is reference counted so the tick loop, the preview and
/// the capture path can all hold the same frame without copying.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Packed pixel data
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride (bytes per row, may include padding)
    pub stride: u32,
}

impl CameraFrame {
    /// Build a frame with a tightly packed stride
    pub fn new(width: u32, height: u32, format: PixelFormat, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            data: data.into(),
            format,
            stride: width * format.bytes_per_pixel(),
        }
    }

    /// A frame with no pixels, as some drivers hand out between real frames
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }

    /// Minimum buffer length implied by the frame geometry
    pub fn expected_len(&self) -> usize {
        if self.height == 0 {
            return 0;
        }
        let row = (self.width * self.format.bytes_per_pixel()) as usize;
        (self.height as usize - 1) * self.stride as usize + row
    }

    /// Whether the buffer actually holds every pixel the geometry promises
    pub fn is_complete(&self) -> bool {
        !self.is_empty() && self.data.len() >= self.expected_len()
    }
}
