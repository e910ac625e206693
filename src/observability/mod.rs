//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP pipeline stages produce:
//!     → record.rs (LogRecord: one JSON object per line)
//!     → logger.rs (stamps timestamp + service metadata)
//!     → sink.rs (stdout in production, memory in tests)
//!
//! Request bodies pass through:
//!     → sanitize.rs (shallow copy, sensitive keys masked)
//!
//! Side channels:
//!     → metrics.rs (counters, histograms; Prometheus scrape)
//!     → logging.rs (tracing diagnostics on stderr)
//! ```
//!
//! # Design Decisions
//! - Request ID flows into every request-scoped record
//! - The sink is an injected handle, not a global
//! - A record is serialized before the sink is touched, so a write is one line

pub mod logger;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod sanitize;
pub mod sink;

pub use logger::Logger;
pub use record::{Attributes, ErrorDetail, Level, LogRecord, Metrics};
pub use sanitize::Sanitizer;
pub use sink::{LogSink, MemorySink, SinkError, StdoutSink};
