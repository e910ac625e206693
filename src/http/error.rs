//! Application errors and their HTTP rendering.
//!
//! Handlers return `Result<_, AppError>`. Rendering an [`AppError`] produces
//! the public `{ "error": ... }` body and stashes an [`ErrorReport`] in the
//! response extensions; the completion stage picks the report up and writes
//! the `error` log record with the request's ID. Nothing in the report
//! reaches the client.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::observability::ErrorDetail;

/// Code logged when an error carries none of its own.
pub const FALLBACK_CODE: &str = "INTERNAL_ERROR";

/// Message used when an error carries none of its own.
pub const FALLBACK_MESSAGE: &str = "Internal server error";

/// A failure raised while handling a request.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: Option<String>,
    message: Option<String>,
    /// Logged in place of `message` when set; never sent to the client.
    detail: Option<String>,
    backtrace: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: Some(message.into()),
            detail: None,
            backtrace: capture_backtrace(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message).with_code("NOT_FOUND")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message).with_code("VALIDATION_ERROR")
    }

    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Request entity too large")
            .with_code("PAYLOAD_TOO_LARGE")
    }

    /// The client body could not be read to the end.
    pub fn request_aborted(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(StatusCode::BAD_REQUEST, "Request aborted").with_code("REQUEST_ABORTED")
        }
    }

    pub fn timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, "Request timed out").with_code("REQUEST_TIMEOUT")
    }

    /// An unexpected failure: 500, fallback code, detail kept out of the body.
    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            message: None,
            detail: Some(detail.into()),
            backtrace: capture_backtrace(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or(FALLBACK_CODE)
    }

    /// What the client sees.
    pub fn public_message(&self) -> &str {
        self.message.as_deref().unwrap_or(FALLBACK_MESSAGE)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code(), self.status, self.public_message())
    }
}

impl std::error::Error for AppError {}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text()).with_code("INVALID_BODY")
    }
}

fn capture_backtrace() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(ErrorBody { error: self.public_message() }),
        )
            .into_response();
        response.extensions_mut().insert(ErrorReport::from(self));
        response
    }
}

/// Log-side view of an [`AppError`], carried in response extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub code: String,
    pub details: Option<String>,
    pub stack_trace: Option<String>,
}

impl ErrorReport {
    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code.clone(),
            details: self.details.clone(),
            stack_trace: self.stack_trace.clone(),
        }
    }
}

impl From<AppError> for ErrorReport {
    fn from(err: AppError) -> Self {
        Self {
            message: err.public_message().to_string(),
            code: err.code().to_string(),
            details: err.detail.or(err.message),
            stack_trace: err.backtrace,
        }
    }
}

/// Response for a panicking handler, used with `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    AppError::unexpected(detail).into_response()
}
