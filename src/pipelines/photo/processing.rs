// SPDX-License-Identifier: GPL-3.0-only

//! Framing for saved photos and history thumbnails
//!
//! The camera delivers 16:9; prints and thumbnails are 3:2. Frames are
//! center-cropped to the output aspect, dropping equal margins on both
//! sides of the long axis, then scaled to the exact output size.

use image::imageops::{self, FilterType};
use image::{RgbImage, RgbaImage};

/// Resampling filter used for every resize (bicubic)
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Region of a source image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered region of a `width`x`height` image with the aspect
/// ratio `target_width`:`target_height`.
pub fn center_crop_rect(width: u32, height: u32, target_width: u32, target_height: u32) -> CropRect {
    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (target_width.max(1) as u64, target_height.max(1) as u64);

    if w * th > h * tw {
        // Source is wider: trim left and right
        let crop_w = (h * tw / th).max(1);
        CropRect {
            x: ((w - crop_w) / 2) as u32,
            y: 0,
            width: crop_w as u32,
            height,
        }
    } else {
        // Source is narrower (or exact): trim top and bottom
        let crop_h = (w * th / tw).max(1);
        CropRect {
            x: 0,
            y: ((h - crop_h) / 2) as u32,
            width,
            height: crop_h as u32,
        }
    }
}

/// Center-crop `image` to the output aspect and scale it to exactly
/// `out_width`x`out_height`.
pub fn frame_for_output(image: &RgbImage, out_width: u32, out_height: u32) -> RgbImage {
    let rect = center_crop_rect(image.width(), image.height(), out_width, out_height);
    let cropped = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();

    if cropped.dimensions() == (out_width, out_height) {
        cropped
    } else {
        imageops::resize(&cropped, out_width, out_height, RESIZE_FILTER)
    }
}

/// Scale a saved photo down to a history thumbnail
pub fn thumbnail(image: &RgbImage, width: u32, height: u32) -> RgbaImage {
    let rgba = image::DynamicImage::ImageRgb8(image.clone()).into_rgba8();
    imageops::resize(&rgba, width, height, RESIZE_FILTER)
}
