//! Image transformer: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Detect format** | `ImageReader::with_guessed_format` |
//! | **Resize** | `resize_exact` + `Lanczos3` (aspect ratio not preserved) |
//! | **Re-encode** | `write_to` in the detected source format |
//!
//! The module is split into:
//! - **Parameters**: [`SourceFormat`] and [`TargetSize`]
//! - **Transform**: in-memory decode/resize/encode used by the handler
//! - **Operations**: file-level wrappers used by the CLI

pub mod operations;
mod params;
pub mod transform;

pub use operations::resize_file;
pub use params::{SourceFormat, TargetSize};
pub use transform::{DecodedImage, TransformError, TransformedImage, decode, encode, transform};
