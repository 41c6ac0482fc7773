// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding for saved photos

use crate::errors::PhotoError;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Encode `image` as baseline JPEG at `quality` (1-100)
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<EncodedImage, PhotoError> {
    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100)).encode_image(image)?;

    debug!(
        width = image.width(),
        height = image.height(),
        quality,
        bytes = data.len(),
        "Encoded JPEG"
    );

    Ok(EncodedImage {
        data,
        width: image.width(),
        height: image.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_decodes_back() {
        let img = RgbImage::from_pixel(64, 48, image::Rgb([200, 100, 50]));
        let encoded = encode_jpeg(&img, 95).unwrap();
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&encoded.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }
}
