//! Object key generation.
//!
//! Keys look like `resized_29871_4f1c9e0b2a7d4c35a6e8b1f07d3c9a12.jpeg`:
//! the invocation's remaining time in milliseconds, then a random v4 UUID.
//! The remaining time alone repeats whenever two invocations start with the
//! same budget; the UUID keeps concurrent uploads from overwriting each other.

use crate::imaging::SourceFormat;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

pub const KEY_PREFIX: &str = "resized_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build a fresh key for an upload in `format`.
    pub fn generate(remaining_time: Duration, format: SourceFormat) -> Self {
        Self::with_suffix(remaining_time, &Uuid::new_v4().simple().to_string(), format)
    }

    pub(crate) fn with_suffix(remaining_time: Duration, suffix: &str, format: SourceFormat) -> Self {
        Self(format!(
            "{KEY_PREFIX}{}_{suffix}.{}",
            remaining_time.as_millis(),
            format.extension()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
