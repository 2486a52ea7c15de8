//! Pipeline error taxonomy.
//!
//! Each stage has its own error enum; [`PipelineError`] folds them into the
//! classes the response builder cares about. Classification decides the
//! status code, the stage error's `Display` supplies the cause text.
//!
//! | Class | Status | Raised by |
//! |---|---|---|
//! | `MalformedRequest` | 400 | unparseable or non-object JSON body |
//! | `MissingField` | 400 | no body, or no `image` field |
//! | `UnsupportedImageFormat` | 500 | bytes aren't a known image encoding |
//! | `Processing` | 500 | bad base64, corrupt image, encoder failure |
//! | `StorageUnavailable` | 500 | put or presign failed |
//! | `Unclassified` | 500 | anything else, including a panic in the transform |

use crate::imaging::TransformError;
use crate::request::RequestError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    MalformedRequest(String),
    #[error("{0}")]
    MissingField(String),
    #[error("{0}")]
    UnsupportedImageFormat(String),
    #[error("{0}")]
    Processing(String),
    #[error("{0}")]
    StorageUnavailable(String),
    #[error("{0}")]
    Unclassified(String),
}

impl PipelineError {
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// Errors caused by the caller's input rather than by processing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedRequest(_) | Self::MissingField(_))
    }
}

impl From<RequestError> for PipelineError {
    fn from(err: RequestError) -> Self {
        let cause = err.to_string();
        match err {
            RequestError::MalformedJson(_) | RequestError::NotAnObject => {
                Self::MalformedRequest(cause)
            }
            RequestError::MissingBody | RequestError::MissingField { .. } => {
                Self::MissingField(cause)
            }
            // Undecodable base64 falls through to the generic processing error.
            RequestError::InvalidImageEncoding(_) => Self::Processing(cause),
        }
    }
}

impl From<TransformError> for PipelineError {
    fn from(err: TransformError) -> Self {
        let cause = err.to_string();
        match err {
            TransformError::UnsupportedFormat(_) => Self::UnsupportedImageFormat(cause),
            TransformError::DecodeFailed { .. }
            | TransformError::EncodeFailed { .. }
            | TransformError::Io(_) => Self::Processing(cause),
        }
    }
}

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_split_between_400_and_500() {
        let missing: PipelineError = RequestError::MissingField { field: "image" }.into();
        assert!(matches!(missing, PipelineError::MissingField(_)));
        assert_eq!(missing.status_code(), 400);

        let no_body: PipelineError = RequestError::MissingBody.into();
        assert_eq!(no_body.status_code(), 400);

        let not_object: PipelineError = RequestError::NotAnObject.into();
        assert!(matches!(not_object, PipelineError::MalformedRequest(_)));
        assert_eq!(not_object.status_code(), 400);

        let bad_base64: PipelineError = RequestError::InvalidImageEncoding("x".into()).into();
        assert!(matches!(bad_base64, PipelineError::Processing(_)));
        assert_eq!(bad_base64.status_code(), 500);
    }

    #[test]
    fn json_syntax_error_is_malformed_request() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PipelineError = RequestError::MalformedJson(json_err).into();
        assert!(matches!(err, PipelineError::MalformedRequest(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn transform_and_storage_errors_are_500() {
        let unsupported: PipelineError =
            TransformError::UnsupportedFormat("content does not match".into()).into();
        assert!(matches!(
            unsupported,
            PipelineError::UnsupportedImageFormat(_)
        ));
        assert_eq!(unsupported.status_code(), 500);

        let storage: PipelineError = StorageError::Upload {
            bucket: "b".into(),
            key: "k".into(),
            reason: "AccessDenied".into(),
        }
        .into();
        assert!(matches!(storage, PipelineError::StorageUnavailable(_)));
        assert_eq!(storage.status_code(), 500);

        assert_eq!(PipelineError::Unclassified("boom".into()).status_code(), 500);
    }

    #[test]
    fn cause_text_is_preserved() {
        let err: PipelineError = RequestError::MissingField { field: "image" }.into();
        assert_eq!(err.to_string(), "missing field 'image' in request body");
    }
}
