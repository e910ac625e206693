//! Request correlation.
//!
//! # Responsibilities
//! - Generate a fresh request ID (UUID v4) for every inbound request
//! - Capture the monotonic start instant used for latency measurement
//! - Make both retrievable by every later stage through request extensions
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Client-supplied `x-request-id` headers are ignored; the ID is never
//!   echoed back, it only shows up in log records
//! - `tokio::time::Instant` so a paused test clock drives latency

use std::task::{Context, Poll};
use std::time::Duration;

use axum::http::Request;
use tokio::time::Instant;
use tower::{Layer, Service};
use uuid::Uuid;

/// Per-request correlation data, owned by one request for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    id: Uuid,
    started_at: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Monotonic time since the request entered the pipeline.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Access to the [`RequestContext`] attached by [`RequestIdLayer`].
pub trait RequestContextExt {
    /// The attached context, or a fresh one when the layer is missing.
    fn context(&self) -> RequestContext;
}

impl<B> RequestContextExt for Request<B> {
    fn context(&self) -> RequestContext {
        match self.extensions().get::<RequestContext>() {
            Some(ctx) => *ctx,
            None => {
                tracing::warn!(path = %self.uri().path(), "Request reached pipeline without a context");
                RequestContext::new()
            }
        }
    }
}

/// Layer that attaches a new [`RequestContext`] to each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        request.extensions_mut().insert(RequestContext::new());
        self.inner.call(request)
    }
}
