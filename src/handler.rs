//! The request-handling pipeline.
//!
//! ```text
//! body ──▶ decode_request ──▶ transform ──▶ persist ──▶ ResponseEnvelope
//!               │                 │            │              ▲
//!               └─────────────────┴────────────┴── error ─────┘
//! ```
//!
//! Stages run strictly in order; the first failure skips the rest and goes
//! straight to the response builder. Nothing survives an invocation except
//! the injected [`AppState`], which holds the store client and config the
//! runtime built at cold start.

use crate::config::HandlerConfig;
use crate::error::PipelineError;
use crate::imaging::{TargetSize, transform};
use crate::request::decode_request;
use crate::response::ResponseEnvelope;
use crate::storage::{ObjectStore, StoredObjectReference, persist};
use lambda_http::{Body, Context, Request, RequestExt, Response};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinError;
use tracing::Instrument;

/// Long-lived state shared by every invocation of a warm container.
pub struct AppState<S> {
    pub store: S,
    pub config: HandlerConfig,
}

/// Per-invocation values taken from the runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationContext {
    /// Time left before the runtime kills the invocation. Feeds the object key.
    pub remaining_time: Duration,
}

impl InvocationContext {
    pub fn from_lambda(ctx: &Context) -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            remaining_time: Duration::from_millis(ctx.deadline.saturating_sub(now_ms)),
        }
    }
}

/// Run every stage, stopping at the first failure.
pub async fn run_pipeline<S: ObjectStore>(
    store: &S,
    config: &HandlerConfig,
    body: Option<&[u8]>,
    ctx: InvocationContext,
) -> Result<StoredObjectReference, PipelineError> {
    let raw = decode_request(body)?;

    // Decoding and resampling are CPU-bound; keep them off the async workers.
    let transformed = tokio::task::spawn_blocking(move || transform(&raw, TargetSize::FIXED))
        .await
        .map_err(unclassified)??;

    let reference = persist(store, transformed, ctx.remaining_time, config.url_expiry()).await?;
    Ok(reference)
}

/// Run the pipeline and map its outcome to a response. Never fails.
pub async fn handle<S: ObjectStore>(
    store: &S,
    config: &HandlerConfig,
    body: Option<&[u8]>,
    ctx: InvocationContext,
) -> ResponseEnvelope {
    tracing::info!(
        remaining_ms = ctx.remaining_time.as_millis() as u64,
        "image processing started"
    );
    let outcome = run_pipeline(store, config, body, ctx).await;

    match &outcome {
        Ok(reference) => {
            tracing::info!(key = %reference.object_key, "image processed");
        }
        Err(err) if err.is_client_error() => {
            tracing::warn!(error = %err, "request rejected");
        }
        Err(err) => {
            tracing::error!(error = %err, "image processing failed");
        }
    }

    ResponseEnvelope::from_outcome(&outcome)
}

/// Lambda entry point: adapt the HTTP event and run [`handle`].
pub async fn function_handler<S: ObjectStore>(
    event: Request,
    state: &AppState<S>,
) -> Result<Response<Body>, lambda_http::Error> {
    let lambda_ctx = event.lambda_context_ref();
    let ctx = lambda_ctx
        .map(InvocationContext::from_lambda)
        .unwrap_or_default();
    let span = tracing::info_span!(
        "invocation",
        request_id = lambda_ctx.map(|c| c.request_id.as_str()).unwrap_or("local"),
    );

    let body: &[u8] = event.body().as_ref();
    let envelope = handle(&state.store, &state.config, Some(body), ctx)
        .instrument(span)
        .await;
    Ok(envelope.into_http())
}

fn unclassified(err: JoinError) -> PipelineError {
    if !err.is_panic() {
        return PipelineError::Unclassified("image transform was cancelled".into());
    }
    let payload = err.into_panic();
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    PipelineError::Unclassified(format!("image transform panicked: {detail}"))
}
