//! Unmatched routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::request::RequestContextExt;
use crate::http::server::AppState;
use crate::observability::{metrics, LogRecord};

/// Fallback for requests no route (or no method on a route) handles.
///
/// A routing miss is a warning, not an error; no `error` block is logged.
pub async fn route_not_found(State(state): State<AppState>, request: Request) -> Response {
    let ctx = request.context();
    let method = request.method().as_str();
    let path = request.uri().path();

    state.logger.emit(
        LogRecord::warn(format!("404 - Not Found - {} {}", method, path))
            .request(ctx.id(), method, path),
    );
    metrics::record_unmatched_route();

    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" }))).into_response()
}
