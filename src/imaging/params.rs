//! Parameter types for the image transform.
//!
//! ## Types
//!
//! - [`SourceFormat`]: The encodings the transformer accepts. The decoded
//!   format is authoritative: the output is re-encoded in it and the object's
//!   content type and key extension are derived from it.
//! - [`TargetSize`]: Output resolution. Always [`TargetSize::FIXED`] (800×600)
//!   in the deployed handler.

use image::ImageFormat;

/// Image encodings accepted on input and reproduced on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    WebP,
}

impl SourceFormat {
    /// Map a format guessed by the `image` crate onto a supported source format.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Tiff => Some(Self::Tiff),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
            Self::WebP => ImageFormat::WebP,
        }
    }

    /// Lower-case format name, e.g. `jpeg`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::WebP => "webp",
        }
    }

    /// Content type stored with the object: `image/<name>`.
    pub fn content_type(self) -> String {
        format!("image/{}", self.name())
    }

    /// Object key extension. Matches [`name`](Self::name), so JPEGs are stored as `.jpeg`.
    pub fn extension(self) -> &'static str {
        self.name()
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Output resolution for the resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    /// 800×600, applied regardless of the source aspect ratio.
    pub const FIXED: Self = Self {
        width: 800,
        height: 600,
    };
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::FIXED
    }
}
