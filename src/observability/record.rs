//! The structured log record written to the sink.
//!
//! A record serializes to one JSON object. Optional parts are skipped when
//! empty so a line never carries `null` placeholders.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Severity of a [`LogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Contextual request fields attached to the request log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Sanitized copy of the request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_params: Option<Map<String, Value>>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.user_agent.is_none() && self.payload.is_none() && self.query_params.is_none()
    }
}

/// Measurements carried by a performance alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub execution_time_ms: f64,
    pub threshold_ms: u64,
}

/// Error detail carried by `error` records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

/// Deployment identity stamped onto records when enabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceMetadata {
    pub service: String,
    pub env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// One line of structured output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    #[serde(flatten)]
    pub service: Option<ServiceMetadata>,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl LogRecord {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            request_id: None,
            method: None,
            path: None,
            message: message.into(),
            attributes: None,
            metrics: None,
            error: None,
            service: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Level::Warn, message)
    }

    /// An `error` record always carries its detail block.
    pub fn error(message: impl Into<String>, detail: ErrorDetail) -> Self {
        let mut record = Self::new(Level::Error, message);
        record.error = Some(detail);
        record
    }

    /// Scope the record to one request.
    pub fn request(mut self, request_id: Uuid, method: &str, path: &str) -> Self {
        self.request_id = Some(request_id);
        self.method = Some(method.to_string());
        self.path = Some(path.to_string());
        self
    }

    /// Attach attributes; an empty set leaves the field out.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = (!attributes.is_empty()).then_some(attributes);
        self
    }

    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_value(record: &LogRecord) -> Value {
        serde_json::to_value(record).unwrap()
    }

    #[test]
    fn test_process_record_has_no_request_fields() {
        let value = to_value(&LogRecord::info("Server running"));
        let obj = value.as_object().unwrap();

        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["level", "message", "timestamp"]);
        assert_eq!(obj["level"], "info");
    }

    #[test]
    fn test_empty_attributes_are_dropped() {
        let record = LogRecord::info("Incoming request").attributes(Attributes::default());
        assert!(record.attributes.is_none());
        assert!(to_value(&record).get("attributes").is_none());
    }

    #[test]
    fn test_field_names_are_camel_case() {
        let id = Uuid::new_v4();
        let record = LogRecord::warn("Slow request detected")
            .request(id, "GET", "/api/boards")
            .metrics(Metrics { execution_time_ms: 1204.5, threshold_ms: 1000 });
        let value = to_value(&record);

        assert_eq!(value["requestId"], json!(id.to_string()));
        assert_eq!(value["metrics"], json!({ "executionTimeMs": 1204.5, "thresholdMs": 1000 }));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_detail_omits_missing_parts() {
        let record = LogRecord::error(
            "Internal server error",
            ErrorDetail { code: "INTERNAL_ERROR".into(), details: None, stack_trace: None },
        );
        assert_eq!(to_value(&record)["error"], json!({ "code": "INTERNAL_ERROR" }));
    }

    #[test]
    fn test_service_metadata_is_flattened() {
        let mut record = LogRecord::info("hello");
        record.service = Some(ServiceMetadata {
            service: "kanban-backend".into(),
            env: "development".into(),
            pod: None,
            namespace: Some("apps".into()),
        });
        let value = to_value(&record);
        assert_eq!(value["service"], "kanban-backend");
        assert_eq!(value["namespace"], "apps");
        assert!(value.get("pod").is_none());
    }

    #[test]
    fn test_timestamp_is_rfc3339_millis() {
        let value = to_value(&LogRecord::info("x"));
        let ts = value["timestamp"].as_str().unwrap();
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
