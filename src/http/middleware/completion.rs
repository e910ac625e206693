//! Completion stage: error records, slow-request alerts, request metrics.
//!
//! Runs right after correlation, so `next` covers the whole rest of the
//! pipeline and the measured latency includes request logging and routing.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::http::error::ErrorReport;
use crate::http::request::RequestContextExt;
use crate::http::server::AppState;
use crate::observability::{metrics, LogRecord, Metrics};

pub async fn track_completion(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = request.context();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let elapsed = ctx.elapsed();

    if let Some(report) = response.extensions_mut().remove::<ErrorReport>() {
        state.logger.emit(
            LogRecord::error(report.message.clone(), report.detail())
                .request(ctx.id(), method.as_str(), &path),
        );
    }

    let execution_time_ms = elapsed.as_secs_f64() * 1000.0;
    let threshold_ms = state.pipeline.slow_request_threshold_ms;
    if execution_time_ms > threshold_ms as f64 {
        state.logger.emit(
            LogRecord::warn("Slow request detected")
                .request(ctx.id(), method.as_str(), &path)
                .metrics(Metrics { execution_time_ms, threshold_ms }),
        );
        metrics::record_slow_request(method.as_str());
    }

    metrics::record_request(method.as_str(), response.status().as_u16(), elapsed);
    tracing::debug!(
        request_id = %ctx.id(),
        status = response.status().as_u16(),
        elapsed_ms = execution_time_ms,
        "Request completed"
    );

    response
}
