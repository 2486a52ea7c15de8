//! Shared test utilities for the image-resize-lambda test suite.
//!
//! Builds synthetic images in memory and wraps them in request bodies the
//! way the frontend sends them.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let jpeg = encoded_image(ImageFormat::Jpeg, 1200, 900);
//! let body = image_body(&jpeg);
//! let bytes = decode_request(Some(body.as_bytes())).unwrap();
//! assert_eq!(bytes, jpeg);
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ColorType, DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Image fixtures
// =========================================================================

/// Encode a gradient test image of the given size in `format`.
///
/// JPEG gets an RGB source (no alpha channel); everything else gets RGBA,
/// which every other encoder accepts.
pub fn encoded_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    } else {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    };
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Encode a gradient test image in `format` with the given pixel layout.
///
/// The caller picks a layout the format's encoder can write.
pub fn encoded_image_with_layout(
    format: ImageFormat,
    layout: ColorType,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 200])
    }));
    let img = match layout {
        ColorType::L8 => DynamicImage::ImageLuma8(rgba.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(rgba.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(rgba.to_rgb8()),
        ColorType::Rgba8 => rgba,
        ColorType::L16 => DynamicImage::ImageLuma16(rgba.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(rgba.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(rgba.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(rgba.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(rgba.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(rgba.to_rgba32f()),
        other => panic!("no fixture for {other:?}"),
    };
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

// =========================================================================
// Request bodies
// =========================================================================

/// JSON request body carrying `bytes` base64-encoded in the `image` field.
pub fn image_body(bytes: &[u8]) -> String {
    serde_json::json!({ "image": STANDARD.encode(bytes) }).to_string()
}
