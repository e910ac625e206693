//! Optional bound on route handling time.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::AppError;
use crate::http::server::AppState;

/// Turns an expired handler into a 408 [`AppError`] so the expiry is
/// logged and rendered like any other failure. A no-op without a limit.
pub async fn enforce_timeout(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(limit) = state.pipeline.request_timeout else {
        return next.run(request).await;
    };

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => AppError::timeout().into_response(),
    }
}
