//! Response builder: the single exit point of every invocation.
//!
//! Success and every failure class become a [`ResponseEnvelope`]. Building
//! one can't fail, so the handler always returns a well-formed JSON body with
//! the CORS headers the browser frontend needs.

use crate::error::PipelineError;
use crate::storage::StoredObjectReference;
use lambda_http::http::{HeaderName, HeaderValue, StatusCode};
use lambda_http::{Body, Response};
use serde::Serialize;
use std::collections::BTreeMap;

pub const SUCCESS_MESSAGE: &str = "Image resized successfully";

/// Headers attached to every response, success or not.
pub const RESPONSE_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-credentials", "true"),
    ("content-type", "application/json"),
];

/// Returned if the body somehow can't be serialized.
const FALLBACK_BODY: &str = r#"{"message":"Error while processing the image"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    pub fn from_outcome(outcome: &Result<StoredObjectReference, PipelineError>) -> Self {
        match outcome {
            Ok(reference) => Self::success(reference),
            Err(err) => Self::failure(err),
        }
    }

    pub fn success(reference: &StoredObjectReference) -> Self {
        Self::new(
            200,
            ResponseBody {
                message: SUCCESS_MESSAGE.to_string(),
                image_url: Some(reference.retrieval_url.clone()),
            },
        )
    }

    pub fn failure(err: &PipelineError) -> Self {
        let message = match err {
            PipelineError::MalformedRequest(cause) => format!("Invalid request format: {cause}"),
            PipelineError::MissingField(cause) => format!("Validation error: {cause}"),
            PipelineError::UnsupportedImageFormat(cause)
            | PipelineError::Processing(cause)
            | PipelineError::StorageUnavailable(cause)
            | PipelineError::Unclassified(cause) => {
                format!("Error while processing the image: {cause}")
            }
        };
        Self::new(
            err.status_code(),
            ResponseBody {
                message,
                image_url: None,
            },
        )
    }

    fn new(status_code: u16, body: ResponseBody) -> Self {
        Self {
            status_code,
            headers: RESPONSE_HEADERS.into_iter().collect(),
            body,
        }
    }

    /// The body as the JSON string API Gateway expects.
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| FALLBACK_BODY.to_string())
    }

    /// Convert into the HTTP response handed back to the Lambda runtime.
    pub fn into_http(self) -> Response<Body> {
        let mut response = Response::new(Body::Text(self.body_json()));
        *response.status_mut() =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let headers = response.headers_mut();
        for (name, value) in self.headers {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        response
    }
}
