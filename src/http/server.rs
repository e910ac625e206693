//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up the observability pipeline (correlation, logging, errors)
//! - Wire up CORS and tower-http tracing
//! - Bind server to listener and stop on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::api::{self, boards::BoardStore};
use crate::config::{AppConfig, CorsConfig, ObservabilityConfig, TimeoutConfig};
use crate::http::error::panic_response;
use crate::http::fallback::route_not_found;
use crate::http::health::health;
use crate::http::middleware::{enforce_timeout, log_request, track_completion};
use crate::http::request::RequestIdLayer;
use crate::lifecycle::ShutdownSignal;
use crate::observability::{Logger, Sanitizer};

/// Settings the pipeline stages read on every request.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub sanitizer: Sanitizer,
    pub slow_request_threshold_ms: u64,
    pub max_body_bytes: usize,
    pub request_timeout: Option<Duration>,
}

impl PipelineSettings {
    pub fn from_config(observability: &ObservabilityConfig, timeouts: &TimeoutConfig) -> Self {
        Self {
            sanitizer: Sanitizer::new(
                observability.sensitive_fields.iter().cloned(),
                &observability.sanitized_methods,
            ),
            slow_request_threshold_ms: observability.slow_request_threshold_ms,
            max_body_bytes: observability.max_body_bytes,
            request_timeout: timeouts.request_secs.map(Duration::from_secs),
        }
    }
}

/// Application state injected into handlers and middleware.
#[derive(Debug, Clone)]
pub struct AppState {
    pub logger: Logger,
    pub pipeline: Arc<PipelineSettings>,
    pub boards: Arc<BoardStore>,
}

impl AppState {
    pub fn new(config: &AppConfig, logger: Logger) -> Self {
        Self {
            logger,
            pipeline: Arc::new(PipelineSettings::from_config(
                &config.observability,
                &config.timeouts,
            )),
            boards: Arc::new(BoardStore::new()),
        }
    }
}

/// HTTP server for the kanban backend.
pub struct HttpServer {
    router: Router,
    logger: Logger,
}

impl HttpServer {
    /// Create a server that logs to stdout.
    pub fn new(config: AppConfig) -> Self {
        let logger = Logger::from_config(&config.observability);
        Self::with_logger(config, logger)
    }

    /// Create a server writing records through the given logger.
    pub fn with_logger(config: AppConfig, logger: Logger) -> Self {
        let state = AppState::new(&config, logger.clone());
        let router = build_router(&config, state);
        Self { router, logger }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        self.logger.info(format!("Server running on http://{}", addr));
        self.logger.info(format!("API available at http://{}/api", addr));
        self.logger.info(format!("Health check at http://{}/health", addr));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Application routes wrapped in the observability pipeline.
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .merge(api::routes());
    instrument(routes, config, state)
}

/// Wrap arbitrary routes in the pipeline: correlation, completion tracking,
/// panic capture, request logging, optional timeout, and the 404 fallback.
pub fn instrument(routes: Router<AppState>, config: &AppConfig, state: AppState) -> Router {
    routes
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(from_fn_with_state(state.clone(), enforce_timeout))
        .layer(from_fn_with_state(state.clone(), log_request))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(state.clone(), track_completion))
        .layer(RequestIdLayer)
        .with_state(state)
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Browsers reject credentials alongside a wildcard origin.
    if config.allowed_origin == "*" {
        tracing::warn!("CORS origin is '*', credentials disabled");
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(&config.allowed_origin) {
        Ok(origin) => layer.allow_origin(origin).allow_credentials(true),
        Err(e) => {
            tracing::warn!(
                origin = %config.allowed_origin,
                error = %e,
                "Invalid CORS origin, cross-origin requests disabled"
            );
            layer
        }
    }
}
