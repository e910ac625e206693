use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::observability::record::LogRecord;

/// Failure to deliver a record.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write log record: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for [`LogRecord`]s.
///
/// `write` is called synchronously from the request pipeline. An
/// implementation must write each record as one unit so records from
/// concurrent requests never interleave.
pub trait LogSink: Send + Sync {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Writes one JSON object per line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        // Holding the lock for a single write_all keeps lines whole.
        let mut out = std::io::stdout().lock();
        out.write_all(&line)?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps records in memory; used to assert on emitted output.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
