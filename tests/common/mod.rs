//! Shared helpers for pipeline and server tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use kanban_backend::config::AppConfig;
use kanban_backend::http::{instrument, AppError, AppState};
use kanban_backend::observability::{Level, LogRecord, Logger, MemorySink};

/// A fully layered router whose records land in memory.
pub struct TestApp {
    pub router: Router,
    pub sink: Arc<MemorySink>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Application routes plus the fixture routes in [`fixture_routes`].
    pub fn with_config(config: AppConfig) -> Self {
        let sink = Arc::new(MemorySink::new());
        let state = AppState::new(&config, Logger::new(sink.clone()));
        let routes = Router::new()
            .route("/health", get(kanban_backend::http::health::health))
            .merge(kanban_backend::api::routes())
            .merge(fixture_routes());
        let router = instrument(routes, &config, state);
        Self { router, sink }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.sink.records()
    }

    /// The single `Incoming request` record; panics if not exactly one.
    pub fn incoming(&self) -> LogRecord {
        let incoming: Vec<_> = self
            .records()
            .into_iter()
            .filter(|r| r.level == Level::Info && r.message == "Incoming request")
            .collect();
        assert_eq!(incoming.len(), 1, "expected one request record, got {:?}", incoming);
        incoming.into_iter().next().unwrap()
    }

    pub fn records_at(&self, level: Level) -> Vec<LogRecord> {
        self.records().into_iter().filter(|r| r.level == level).collect()
    }

    pub fn records_for(&self, id: Uuid) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.request_id == Some(id))
            .collect()
    }
}

/// Routes that exercise pipeline branches the API never hits.
pub fn fixture_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(|Json(body): Json<Value>| async move { Json(body) }))
        .route(
            "/echo",
            post(|body: Bytes| async move { body })
                .put(|body: Bytes| async move { body })
                .patch(|body: Bytes| async move { body }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(1001)).await;
                "done"
            }),
        )
        .route(
            "/fast",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "done"
            }),
        )
        .route(
            "/sleep-5s",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        )
        .route(
            "/panic",
            get(|| async {
                if true {
                    panic!("kaboom");
                }
                "unreachable"
            }),
        )
        .route(
            "/unexpected",
            get(|| async { Err::<(), _>(AppError::unexpected("disk full")) }),
        )
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}
