//! Request logging stage.
//!
//! Emits the single `info` record for a request before it is routed. Bodies
//! of captured methods are buffered (up to `max_body_bytes`), decoded,
//! sanitized for the log, and handed on to the handler unchanged.

use std::error::Error as _;

use axum::{
    body::{self, Body},
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;

use crate::http::error::AppError;
use crate::http::request::RequestContextExt;
use crate::http::server::AppState;
use crate::observability::sanitize::{decode_body, query_params};
use crate::observability::{Attributes, LogRecord};

pub async fn log_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = request.context();
    let (parts, body) = request.into_parts();

    let mut attributes = Attributes {
        user_agent: parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        ..Attributes::default()
    };

    let emit = |attributes: Attributes| {
        state.logger.emit(
            LogRecord::info("Incoming request")
                .request(ctx.id(), parts.method.as_str(), parts.uri.path())
                .attributes(attributes),
        );
    };

    let sanitizer = &state.pipeline.sanitizer;
    let body = if sanitizer.captures_body(&parts.method) {
        let bytes = match body::to_bytes(body, state.pipeline.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(request_id = %ctx.id(), error = %e, "Failed to buffer request body");
                emit(attributes);
                return read_failure(&e).into_response();
            }
        };

        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        attributes.payload = decode_body(content_type, &bytes).map(|v| sanitizer.sanitize(&v));
        Body::from(bytes)
    } else {
        if parts.method == Method::GET {
            attributes.query_params = query_params(parts.uri.query());
        }
        body
    };

    emit(attributes);
    next.run(Request::from_parts(parts, body)).await
}

/// 413 when the body hit the size cap, 400 for any other read failure.
fn read_failure(error: &axum::Error) -> AppError {
    let mut source = error.source();
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return AppError::payload_too_large();
        }
        source = cause.source();
    }
    AppError::request_aborted(error.to_string())
}
