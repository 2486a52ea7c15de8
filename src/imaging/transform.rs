//! Decode → resize → re-encode, entirely in memory.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Format detection | `image::ImageReader::with_guessed_format` (magic bytes) |
//! | Decode | `image` crate pure-Rust decoders |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode | `DynamicImage::write_to` in the source format |
//!
//! The resize ignores the source aspect ratio: every output is exactly the
//! target size. Wide or tall sources are stretched to fit.

use super::params::{SourceFormat, TargetSize};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageReader};
use std::borrow::Cow;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to decode {format} image: {reason}")]
    DecodeFailed {
        format: SourceFormat,
        reason: String,
    },
    #[error("failed to encode {format} image: {reason}")]
    EncodeFailed {
        format: SourceFormat,
        reason: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully parsed upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: SourceFormat,
}

impl DecodedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Encoded output, ready for upload.
#[derive(Debug, Clone)]
pub struct TransformedImage {
    pub bytes: Vec<u8>,
    pub format: SourceFormat,
    pub width: u32,
    pub height: u32,
}

impl TransformedImage {
    pub fn content_type(&self) -> String {
        self.format.content_type()
    }
}

/// Parse raw bytes into an image, detecting the format from content.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, TransformError> {
    if bytes.is_empty() {
        return Err(TransformError::UnsupportedFormat("empty image payload".into()));
    }

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = match reader.format() {
        Some(guessed) => SourceFormat::from_image_format(guessed).ok_or_else(|| {
            TransformError::UnsupportedFormat(format!("{guessed:?} images are not accepted"))
        })?,
        None => {
            return Err(TransformError::UnsupportedFormat(
                "content does not match any known image encoding".into(),
            ));
        }
    };

    let image = reader.decode().map_err(|e| TransformError::DecodeFailed {
        format,
        reason: e.to_string(),
    })?;

    Ok(DecodedImage { image, format })
}

/// Resize to exactly `target`, distorting the source if the aspect ratios differ.
pub fn resize_exact(decoded: &DecodedImage, target: TargetSize) -> DynamicImage {
    decoded
        .image
        .resize_exact(target.width, target.height, FilterType::Lanczos3)
}

/// Encode `img` in `format`.
///
/// Pixel layouts an encoder can't take are converted first: JPEG has no alpha,
/// GIF and WebP only accept 8-bit RGBA, BMP has no 16-bit or float layouts,
/// PNG has no float layouts and TIFF has no gray+alpha layouts.
pub fn encode(img: &DynamicImage, format: SourceFormat) -> Result<Vec<u8>, TransformError> {
    let color = img.color();
    let prepared: Cow<'_, DynamicImage> = match format {
        SourceFormat::Jpeg => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
        SourceFormat::Gif | SourceFormat::WebP => {
            Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8()))
        }
        SourceFormat::Bmp if !is_8bit(color) => {
            Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8()))
        }
        SourceFormat::Tiff if color == ColorType::La8 => {
            Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8()))
        }
        SourceFormat::Tiff if color == ColorType::La16 => {
            Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16()))
        }
        SourceFormat::Png | SourceFormat::Tiff if is_float(color) => {
            Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16()))
        }
        _ => Cow::Borrowed(img),
    };

    let mut buf = Cursor::new(Vec::new());
    prepared
        .write_to(&mut buf, format.image_format())
        .map_err(|e| TransformError::EncodeFailed {
            format,
            reason: e.to_string(),
        })?;
    Ok(buf.into_inner())
}

fn is_8bit(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
    )
}

fn is_float(color: ColorType) -> bool {
    matches!(color, ColorType::Rgb32F | ColorType::Rgba32F)
}

/// Full transform: decode, resize to `target`, re-encode in the source format.
pub fn transform(bytes: &[u8], target: TargetSize) -> Result<TransformedImage, TransformError> {
    let decoded = decode(bytes)?;
    let (src_w, src_h) = decoded.dimensions();
    tracing::info!(
        format = %decoded.format,
        width = src_w,
        height = src_h,
        "image decoded"
    );

    let resized = resize_exact(&decoded, target);
    tracing::debug!(width = target.width, height = target.height, "image resized");

    let bytes = encode(&resized, decoded.format)?;
    tracing::info!(
        format = %decoded.format,
        size_bytes = bytes.len(),
        "image re-encoded"
    );

    Ok(TransformedImage {
        bytes,
        format: decoded.format,
        width: resized.width(),
        height: resized.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encoded_image, encoded_image_with_layout};
    use image::ImageFormat;

    fn reopen(bytes: &[u8]) -> (ImageFormat, u32, u32) {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .unwrap();
        let format = reader.format().unwrap();
        let img = reader.decode().unwrap();
        (format, img.width(), img.height())
    }

    #[test]
    fn landscape_jpeg_becomes_800x600_jpeg() {
        let input = encoded_image(ImageFormat::Jpeg, 1200, 900);
        let out = transform(&input, TargetSize::FIXED).unwrap();

        assert_eq!(out.format, SourceFormat::Jpeg);
        assert_eq!((out.width, out.height), (800, 600));
        assert_eq!(out.content_type(), "image/jpeg");
        assert_eq!(reopen(&out.bytes), (ImageFormat::Jpeg, 800, 600));
    }

    #[test]
    fn portrait_png_is_stretched_not_letterboxed() {
        let input = encoded_image(ImageFormat::Png, 300, 900);
        let out = transform(&input, TargetSize::FIXED).unwrap();

        assert_eq!(reopen(&out.bytes), (ImageFormat::Png, 800, 600));
    }

    #[test]
    fn small_source_is_upscaled() {
        let input = encoded_image(ImageFormat::Png, 16, 16);
        let out = transform(&input, TargetSize::FIXED).unwrap();
        assert_eq!((out.width, out.height), (800, 600));
    }

    #[test]
    fn every_accepted_format_round_trips_its_format() {
        let cases = [
            (ImageFormat::Gif, SourceFormat::Gif),
            (ImageFormat::Bmp, SourceFormat::Bmp),
            (ImageFormat::Tiff, SourceFormat::Tiff),
            (ImageFormat::WebP, SourceFormat::WebP),
        ];
        for (image_format, expected) in cases {
            let input = encoded_image(image_format, 120, 90);
            let out = transform(&input, TargetSize::FIXED).unwrap();
            assert_eq!(out.format, expected);
            assert_eq!(reopen(&out.bytes), (image_format, 800, 600));
        }
    }

    #[test]
    fn gray_alpha_and_deep_sources_keep_their_format() {
        use ColorType::*;
        let cases: &[(ImageFormat, &[ColorType])] = &[
            (ImageFormat::Jpeg, &[L8, Rgb8]),
            (
                ImageFormat::Png,
                &[L8, La8, L16, La16, Rgb8, Rgba8, Rgb16, Rgba16],
            ),
            (ImageFormat::Gif, &[Rgb8, Rgba8]),
            (ImageFormat::Bmp, &[L8, La8, Rgb8, Rgba8]),
            (
                ImageFormat::Tiff,
                &[L8, L16, Rgb8, Rgba8, Rgb16, Rgba16, Rgb32F, Rgba32F],
            ),
            (ImageFormat::WebP, &[L8, La8, Rgb8, Rgba8]),
        ];
        for &(image_format, layouts) in cases {
            for &layout in layouts {
                let input = encoded_image_with_layout(image_format, layout, 120, 90);
                let out = transform(&input, TargetSize::FIXED)
                    .unwrap_or_else(|e| panic!("{image_format:?} {layout:?}: {e}"));
                assert_eq!(
                    reopen(&out.bytes),
                    (image_format, 800, 600),
                    "{image_format:?} {layout:?}"
                );
            }
        }
    }

    #[test]
    fn encode_accepts_every_decoded_layout_in_every_format() {
        let sources = [
            DynamicImage::new_luma8(8, 6),
            DynamicImage::new_luma_a8(8, 6),
            DynamicImage::new_rgb8(8, 6),
            DynamicImage::new_rgba8(8, 6),
            DynamicImage::new_luma16(8, 6),
            DynamicImage::new_luma_a16(8, 6),
            DynamicImage::new_rgb16(8, 6),
            DynamicImage::new_rgba16(8, 6),
            DynamicImage::new_rgb32f(8, 6),
            DynamicImage::new_rgba32f(8, 6),
        ];
        let formats = [
            SourceFormat::Jpeg,
            SourceFormat::Png,
            SourceFormat::Gif,
            SourceFormat::Bmp,
            SourceFormat::Tiff,
            SourceFormat::WebP,
        ];
        for format in formats {
            for img in &sources {
                let bytes = encode(img, format)
                    .unwrap_or_else(|e| panic!("{format} {:?}: {e}", img.color()));
                assert_eq!(
                    reopen(&bytes),
                    (format.image_format(), 8, 6),
                    "{format} {:?}",
                    img.color()
                );
            }
        }
    }

    #[test]
    fn tiff_encode_accepts_gray_alpha() {
        for img in [
            DynamicImage::new_luma_a8(800, 600),
            DynamicImage::new_luma_a16(800, 600),
        ] {
            let bytes = encode(&img, SourceFormat::Tiff).unwrap();
            assert_eq!(reopen(&bytes), (ImageFormat::Tiff, 800, 600));
        }
    }

    #[test]
    fn custom_target_size_is_honoured() {
        let input = encoded_image(ImageFormat::Png, 50, 50);
        let out = transform(
            &input,
            TargetSize {
                width: 40,
                height: 10,
            },
        )
        .unwrap();
        assert_eq!((out.width, out.height), (40, 10));
    }

    #[test]
    fn decode_reports_source_dimensions() {
        let input = encoded_image(ImageFormat::Jpeg, 64, 48);
        let decoded = decode(&input).unwrap();
        assert_eq!(decoded.format, SourceFormat::Jpeg);
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn empty_payload_is_unsupported() {
        assert!(matches!(
            decode(&[]),
            Err(TransformError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn non_image_bytes_are_unsupported() {
        let result = decode(b"this is plainly not an image");
        assert!(matches!(result, Err(TransformError::UnsupportedFormat(_))));
    }

    #[test]
    fn truncated_jpeg_fails_to_decode() {
        let input = encoded_image(ImageFormat::Jpeg, 64, 64);
        let result = decode(&input[..32]);
        assert!(matches!(
            result,
            Err(TransformError::DecodeFailed {
                format: SourceFormat::Jpeg,
                ..
            })
        ));
    }

    #[test]
    fn jpeg_encode_drops_alpha() {
        let img = DynamicImage::new_rgba8(10, 10);
        let bytes = encode(&img, SourceFormat::Jpeg).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn bmp_encode_accepts_16bit_source() {
        let img = DynamicImage::new_rgb16(10, 10);
        let bytes = encode(&img, SourceFormat::Bmp).unwrap();
        assert_eq!(&bytes[0..2], b"BM");
    }
}
