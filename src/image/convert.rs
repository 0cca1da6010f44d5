//! Raster format conversion.
//!
//! - `to_jpeg()` - compressed photographic derivative
//! - `to_avif_preview()` - small preview, bounded and never upscaled

use crate::core::{BuildError, Result};
use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};

/// Re-encode a raster as JPEG at `quality` (0-100).
///
/// Alpha is dropped; JPEG has no transparency.
pub fn to_jpeg(raster: &[u8], quality: u8) -> Result<Vec<u8>> {
    let rgb = image::load_from_memory(raster)?.to_rgb8();
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)))?;
    Ok(out)
}

/// Shrink `img` to fit inside a `max` x `max` box, keeping aspect ratio.
///
/// Images already inside the box are returned unchanged.
pub fn resize_within(img: DynamicImage, max: u32) -> DynamicImage {
    if img.width() <= max && img.height() <= max {
        return img;
    }
    img.resize(max, max, FilterType::Lanczos3)
}

/// Re-encode a raster as a small AVIF preview.
///
/// `effort` follows the 0 (fastest) - 9 (smallest) scale and maps onto the
/// encoder's inverse speed scale.
pub fn to_avif_preview(raster: &[u8], max_size: u32, quality: u8, effort: u8) -> Result<Vec<u8>> {
    let img = resize_within(image::load_from_memory(raster)?, max_size);
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<ravif::RGBA8> = rgba
        .as_raw()
        .chunks_exact(4)
        .map(|c| ravif::RGBA8::new(c[0], c[1], c[2], c[3]))
        .collect();

    let encoded = ravif::Encoder::new()
        .with_quality(f32::from(quality))
        .with_speed(avif_speed(effort))
        .encode_rgba(ravif::Img::new(
            pixels.as_slice(),
            width as usize,
            height as usize,
        ))
        .map_err(|e| BuildError::Avif(e.to_string()))?;

    Ok(encoded.avif_file)
}

fn avif_speed(effort: u8) -> u8 {
    10_u8.saturating_sub(effort).clamp(1, 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_jpeg_keeps_dimensions() {
        let jpeg = to_jpeg(&png(120, 60), 80).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 60));
    }

    #[test]
    fn test_resize_within_tall_source() {
        let img = DynamicImage::new_rgba8(512, 2048);
        let resized = resize_within(img, 640);
        assert_eq!((resized.width(), resized.height()), (160, 640));
    }

    #[test]
    fn test_resize_within_never_upscales() {
        let img = DynamicImage::new_rgba8(300, 200);
        let resized = resize_within(img, 640);
        assert_eq!((resized.width(), resized.height()), (300, 200));
    }

    #[test]
    fn test_avif_preview() {
        let avif = to_avif_preview(&png(64, 32), 16, 50, 4).unwrap();
        assert_eq!(&avif[4..8], b"ftyp");
    }

    #[test]
    fn test_avif_speed_mapping() {
        assert_eq!(avif_speed(0), 10);
        assert_eq!(avif_speed(4), 6);
        assert_eq!(avif_speed(9), 1);
        assert_eq!(avif_speed(12), 1);
    }

    #[test]
    fn test_unreadable_source() {
        assert!(matches!(to_jpeg(b"not an image", 80), Err(BuildError::Image(_))));
    }
}
