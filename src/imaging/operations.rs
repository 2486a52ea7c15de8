//! File-level operations used by the CLI.
//!
//! The Lambda path works on in-memory buffers only; these helpers wrap the
//! same transform around local files so a build can be checked against real
//! photos without deploying.

use super::params::TargetSize;
use super::transform::{TransformError, TransformedImage, transform};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Resize the image at `input` and write it to `output`.
///
/// The output keeps the input's format whatever `output`'s extension says.
pub fn resize_file(input: &Path, output: &Path, target: TargetSize) -> Result<TransformedImage> {
    let bytes = std::fs::read(input)?;
    let transformed = transform(&bytes, target)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &transformed.bytes)?;
    Ok(transformed)
}
