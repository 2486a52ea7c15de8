//! # Image Resize Lambda
//!
//! A single-purpose serverless function: the browser posts an image as base64
//! JSON, the function resizes it to 800×600, stores the result in S3 and
//! answers with a presigned link to it.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! Every invocation runs the same four stages, in order:
//!
//! ```text
//! 1. Decode     JSON body    →  raw bytes          (request)
//! 2. Transform  raw bytes    →  800×600 re-encode  (imaging)
//! 3. Persist    encoded      →  S3 key + URL       (storage)
//! 4. Respond    outcome      →  JSON + CORS        (response)
//! ```
//!
//! A failure at any stage skips straight to stage 4. Stage errors are typed
//! per module and classified once in [`error::PipelineError`], which is the
//! only thing the response builder looks at.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`request`] | Stage 1: extracts and base64-decodes the `image` field |
//! | [`imaging`] | Stage 2: decode, Lanczos3 resize to a fixed size, re-encode in the source format |
//! | [`storage`] | Stage 3: [`ObjectStore`](storage::ObjectStore) trait, S3 implementation, key generation |
//! | [`response`] | Stage 4: status code, message, CORS headers |
//! | [`error`] | Error taxonomy and status-code classification |
//! | [`handler`] | Wires the stages together; Lambda entry point |
//! | [`config`] | Environment/TOML configuration via `confique` |
//!
//! # Design Decisions
//!
//! ## Fixed Output Size, No Aspect Preservation
//!
//! Every output is exactly 800×600. A 4:3 source scales cleanly; anything
//! else is stretched. The frontend lays images out in a fixed 800×600 slot, so
//! this is the expected behaviour, not a bug to fix.
//!
//! ## Source Format Is Output Format
//!
//! A PNG comes back as a PNG, a JPEG as a JPEG. The format detected from the
//! bytes (never the client's claim) picks the encoder, the `Content-Type` and
//! the key extension.
//!
//! ## Injected Store, No Globals
//!
//! The S3 client is built once per container in `main` and passed in through
//! [`handler::AppState`]. Tests hand the same pipeline an in-memory store.
//!
//! ## Unique Keys
//!
//! Keys are `resized_<remaining-ms>_<uuid>.<ext>`. Two invocations with the
//! same time budget would otherwise collide and silently overwrite each other.

pub mod config;
pub mod error;
pub mod handler;
pub mod imaging;
pub mod request;
pub mod response;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;
