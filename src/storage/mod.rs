//! Object store writer.
//!
//! The [`ObjectStore`] trait is the seam between the pipeline and the bucket.
//! It has exactly two operations, a put and a presigned GET, so the handler
//! can be exercised end to end against an in-memory store.
//!
//! The production implementation is [`S3Store`](s3::S3Store). The client it
//! wraps is built once by the binary and injected; nothing in this module
//! holds global state.

mod key;
pub mod s3;

pub use key::{KEY_PREFIX, ObjectKey};
pub use s3::S3Store;

use crate::imaging::TransformedImage;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("upload of {key} to bucket {bucket} failed: {reason}")]
    Upload {
        bucket: String,
        key: String,
        reason: String,
    },
    #[error("could not presign {key}: {reason}")]
    Presign { key: String, reason: String },
}

/// A bucket the handler can write to and hand out read links for.
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` in a single put.
    fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Read-only URL for `key`, valid for `expires_in`.
    fn presign_get(
        &self,
        key: &ObjectKey,
        expires_in: Duration,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Bucket name, for logs and error messages.
    fn location(&self) -> &str;
}

/// Where an upload ended up and how to fetch it.
///
/// The URL stops working after `expires_in`; the object itself stays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObjectReference {
    pub object_key: ObjectKey,
    pub retrieval_url: String,
    pub expires_in: Duration,
}

/// Upload `image` under a fresh key and presign a GET for it.
///
/// One put, one presign, no retries.
pub async fn persist<S: ObjectStore>(
    store: &S,
    image: TransformedImage,
    remaining_time: Duration,
    expires_in: Duration,
) -> Result<StoredObjectReference, StorageError> {
    let key = ObjectKey::generate(remaining_time, image.format);
    let content_type = image.content_type();

    tracing::info!(
        bucket = store.location(),
        key = %key,
        content_type = %content_type,
        size_bytes = image.bytes.len(),
        "uploading resized image"
    );
    store.put(&key, image.bytes, &content_type).await?;
    tracing::info!(bucket = store.location(), key = %key, "upload complete");

    let retrieval_url = store.presign_get(&key, expires_in).await?;
    tracing::info!(
        key = %key,
        expires_in_secs = expires_in.as_secs(),
        "presigned retrieval URL generated"
    );

    Ok(StoredObjectReference {
        object_key: key,
        retrieval_url,
        expires_in,
    })
}
