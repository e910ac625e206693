//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the kanban backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request logging, sanitization and metrics settings.
    pub observability: ObservabilityConfig,

    /// Cross-origin settings for the browser frontend.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level for process diagnostics (trace, debug, info, warn, error).
    pub log_level: String,

    /// Requests slower than this emit a performance alert.
    pub slow_request_threshold_ms: u64,

    /// Top-level body keys whose values are masked before logging.
    pub sensitive_fields: Vec<String>,

    /// Methods whose request body is captured (sanitized) in the request log.
    pub sanitized_methods: Vec<String>,

    /// Upper bound on a captured request body; larger bodies are rejected.
    pub max_body_bytes: usize,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Stamp service/env/pod/namespace onto every log record.
    pub service_metadata: bool,

    /// Service name reported when `service_metadata` is on.
    pub service_name: String,

    /// Deployment environment reported when `service_metadata` is on.
    pub environment: String,

    /// Pod name, usually injected through the environment.
    pub pod: Option<String>,

    /// Pod namespace, usually injected through the environment.
    pub namespace: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            slow_request_threshold_ms: 1000,
            sensitive_fields: ["password", "token", "secret", "authorization"]
                .into_iter()
                .map(String::from)
                .collect(),
            sanitized_methods: ["POST", "PUT", "PATCH"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_body_bytes: 100 * 1024,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            service_metadata: false,
            service_name: "kanban-backend".to_string(),
            environment: "development".to_string(),
            pod: None,
            namespace: None,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin allowed to call the API with credentials.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// Timeout configuration.
///
/// Request handling is not bounded unless `request_secs` is set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: Option<u64>,
}
