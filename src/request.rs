//! Request decoder: pulls the base64 image out of the inbound JSON body.
//!
//! Expected body:
//!
//! ```json
//! { "image": "<base64>" }
//! ```
//!
//! The value may also be a data URL (`data:image/png;base64,...`), which is
//! what `FileReader.readAsDataURL` hands the frontend. Whitespace inside the
//! payload (line-wrapped base64) is ignored. Nothing here looks at the image
//! bytes themselves; that's the transformer's job.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use thiserror::Error;

/// Name of the body field carrying the image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("request body is missing; expected a JSON object with an 'image' field")]
    MissingBody,
    #[error("{0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("missing field '{field}' in request body")]
    MissingField { field: &'static str },
    #[error("field 'image' is not valid base64: {0}")]
    InvalidImageEncoding(String),
}

/// Extract the raw image bytes from a request body.
pub fn decode_request(body: Option<&[u8]>) -> Result<Vec<u8>, RequestError> {
    let body = body
        .filter(|b| !b.trim_ascii().is_empty())
        .ok_or(RequestError::MissingBody)?;

    let parsed: Value = serde_json::from_slice(body)?;
    let fields = parsed.as_object().ok_or(RequestError::NotAnObject)?;
    let image = fields
        .get(IMAGE_FIELD)
        .ok_or(RequestError::MissingField { field: IMAGE_FIELD })?;

    let encoded = image.as_str().ok_or_else(|| {
        RequestError::InvalidImageEncoding(format!("expected a string, found {}", kind(image)))
    })?;

    let bytes = decode_base64(encoded)?;
    tracing::info!(size_bytes = bytes.len(), "image payload decoded");
    Ok(bytes)
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, RequestError> {
    let payload = strip_data_url(encoded)?;
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| RequestError::InvalidImageEncoding(e.to_string()))
}

/// `data:image/png;base64,AAAA` → `AAAA`. Plain base64 passes through.
fn strip_data_url(value: &str) -> Result<&str, RequestError> {
    let Some(rest) = value.strip_prefix("data:") else {
        return Ok(value);
    };
    rest.split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or_else(|| RequestError::InvalidImageEncoding("data URL is not base64-encoded".into()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
