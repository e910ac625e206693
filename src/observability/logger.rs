//! The process-wide logging handle.
//!
//! A [`Logger`] is built once at startup and cloned into application state,
//! so every request stage writes through the same sink without touching
//! global state.

use std::sync::Arc;

use chrono::Utc;

use crate::config::ObservabilityConfig;
use crate::observability::record::{LogRecord, ServiceMetadata};
use crate::observability::sink::{LogSink, StdoutSink};

#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    service: Option<ServiceMetadata>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink, service: None }
    }

    /// JSON lines on stdout, stamped with service metadata if configured.
    pub fn from_config(config: &ObservabilityConfig) -> Self {
        Self::new(Arc::new(StdoutSink)).with_service_metadata(config)
    }

    /// Attach deployment identity when `service_metadata` is enabled.
    pub fn with_service_metadata(mut self, config: &ObservabilityConfig) -> Self {
        self.service = config.service_metadata.then(|| ServiceMetadata {
            service: config.service_name.clone(),
            env: config.environment.clone(),
            pod: config.pod.clone(),
            namespace: config.namespace.clone(),
        });
        self
    }

    /// Stamp and write a record. Sink failures never reach the caller.
    pub fn emit(&self, mut record: LogRecord) {
        record.timestamp = Utc::now();
        if record.service.is_none() {
            record.service = self.service.clone();
        }

        if let Err(e) = self.sink.write(&record) {
            tracing::error!(error = %e, record = %record.message, "Dropping log record");
        }
    }

    /// Process-level info record, outside any request.
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogRecord::info(message));
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::record::Level;
    use crate::observability::sink::{MemorySink, SinkError};

    struct FailingSink;

    impl LogSink for FailingSink {
        fn write(&self, _record: &LogRecord) -> Result<(), SinkError> {
            Err(SinkError::Io(std::io::Error::other("closed")))
        }
    }

    #[test]
    fn test_emit_without_metadata() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(sink.clone());

        logger.info("Server running");
        logger.emit(LogRecord::warn("Low disk"));

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[1].level, Level::Warn);
        assert!(records.iter().all(|r| r.service.is_none() && r.request_id.is_none()));
    }

    #[test]
    fn test_metadata_is_stamped_when_enabled() {
        let sink = Arc::new(MemorySink::new());
        let config = ObservabilityConfig {
            service_metadata: true,
            pod: Some("kanban-0".into()),
            ..ObservabilityConfig::default()
        };
        let logger = Logger::new(sink.clone()).with_service_metadata(&config);

        logger.info("hello");

        let service = sink.records()[0].service.clone().unwrap();
        assert_eq!(service.service, "kanban-backend");
        assert_eq!(service.env, "development");
        assert_eq!(service.pod.as_deref(), Some("kanban-0"));
    }

    #[test]
    fn test_metadata_off_by_default() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(sink.clone()).with_service_metadata(&ObservabilityConfig::default());
        logger.info("hello");
        assert!(sink.records()[0].service.is_none());
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        let logger = Logger::new(Arc::new(FailingSink));
        logger.info("goes nowhere");
    }
}
