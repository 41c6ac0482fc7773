// SPDX-License-Identifier: GPL-3.0-only

//! CPU pixel sampling shared by the preview and the photo pipeline

use super::types::{CameraFrame, PixelFormat};
use crate::errors::PhotoError;
use image::RgbImage;

/// Sample one pixel of `frame` as RGB. Out-of-range coordinates clamp to the
/// edge; a short buffer reads as black.
pub fn sample_pixel_rgb(frame: &CameraFrame, x: u32, y: u32) -> (u8, u8, u8) {
    let x = x.min(frame.width.saturating_sub(1));
    let y = y.min(frame.height.saturating_sub(1));
    let data: &[u8] = &frame.data;

    match frame.format {
        PixelFormat::RGB24 => {
            let idx = (y * frame.stride + x * 3) as usize;
            match data.get(idx..idx + 3) {
                Some(px) => (px[0], px[1], px[2]),
                None => (0, 0, 0),
            }
        }
        PixelFormat::YUYV => {
            // Two pixels share one chroma pair in 4 bytes: Y0 U Y1 V
            let pair_x = (x & !1) as usize;
            let base = (y as usize) * (frame.stride as usize) + pair_x * 2;
            let Some(&[y0, u, y1, v]) = data.get(base..base + 4) else {
                return (0, 0, 0);
            };
            let luma = if x & 1 == 1 { y1 } else { y0 };
            yuv_to_rgb(luma, u, v)
        }
    }
}

/// Convert YUV (BT.601) to RGB
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

    (r, g, b)
}

/// Convert a whole frame to an RGB image, optionally mirrored horizontally
pub fn frame_to_rgb(frame: &CameraFrame, mirror: bool) -> Result<RgbImage, PhotoError> {
    if frame.is_empty() {
        return Err(PhotoError::NoFrameAvailable);
    }
    if !frame.is_complete() {
        return Err(PhotoError::MalformedFrame(format!(
            "{}x{} {:?} needs {} bytes, got {}",
            frame.width,
            frame.height,
            frame.format,
            frame.expected_len(),
            frame.data.len()
        )));
    }

    let width = frame.width;
    Ok(RgbImage::from_fn(width, frame.height, |x, y| {
        let src_x = if mirror { width - 1 - x } else { x };
        let (r, g, b) = sample_pixel_rgb(frame, src_x, y);
        image::Rgb([r, g, b])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuv_gray_is_neutral() {
        assert_eq!(yuv_to_rgb(128, 128, 128), (128, 128, 128));
        assert_eq!(yuv_to_rgb(255, 128, 128), (255, 255, 255));
    }

    #[test]
    fn test_yuyv_sampling_picks_correct_luma() {
        // One pixel pair: Y0=10, U=128, Y1=200, V=128
        let frame = CameraFrame::new(2, 1, PixelFormat::YUYV, vec![10u8, 128, 200, 128]);
        assert_eq!(sample_pixel_rgb(&frame, 0, 0), (10, 10, 10));
        assert_eq!(sample_pixel_rgb(&frame, 1, 0), (200, 200, 200));
    }

    #[test]
    fn test_frame_to_rgb_mirror() {
        let frame = CameraFrame::new(2, 1, PixelFormat::RGB24, vec![255u8, 0, 0, 0, 0, 255]);
        let plain = frame_to_rgb(&frame, false).unwrap();
        let mirrored = frame_to_rgb(&frame, true).unwrap();
        assert_eq!(plain.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(mirrored.get_pixel(0, 0).0, [0, 0, 255]);
    }

    #[test]
    fn test_frame_to_rgb_rejects_short_buffer() {
        let frame = CameraFrame::new(4, 4, PixelFormat::RGB24, vec![0u8; 8]);
        assert!(matches!(
            frame_to_rgb(&frame, false),
            Err(PhotoError::MalformedFrame(_))
        ));
    }
}
