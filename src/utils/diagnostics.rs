//! Diagnostic sink for per-item transform failures.
//!
//! The pipeline never logs failures on its own authority: it hands them to the
//! sink it was configured with, and only when verbose diagnostics are enabled.
//! Hosts that already route warnings elsewhere can plug in their own sink.

use crate::core::metadata::MetadataItem;
use crate::error::RewriteError;
use std::sync::Mutex;
use tracing::warn;

/// Receives `(message, item, error)` for every item omitted after a failure
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, message: &str, item: &MetadataItem, error: &RewriteError);
}

/// Forwards failures to `tracing` at WARN level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str, item: &MetadataItem, error: &RewriteError) {
        warn!(
            field_id = item.field_id,
            type_tag = ?item.type_tag,
            value = ?item.value,
            error = %error,
            "{}",
            message
        );
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _message: &str, _item: &MetadataItem, _error: &RewriteError) {}
}

/// A failure captured by [`RecordingSink`]
#[derive(Debug, Clone)]
pub struct RecordedFailure {
    pub message: String,
    pub item: MetadataItem,
    pub error: String,
}

/// Keeps every report in memory, for hosts that batch diagnostics and for tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<RecordedFailure>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far
    pub fn drain(&self) -> Vec<RecordedFailure> {
        match self.records.lock() {
            Ok(mut records) => std::mem::take(&mut *records),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, message: &str, item: &MetadataItem, error: &RewriteError) {
        let record = RecordedFailure {
            message: message.to_string(),
            item: item.clone(),
            error: error.to_string(),
        };
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::MetaValue;

    #[test]
    fn test_recording_sink_drains() {
        let sink = RecordingSink::new();
        let item = MetadataItem::new(1, MetaValue::VarInt(3));
        sink.report("failed", &item, &RewriteError::transform("bad"));
        assert_eq!(sink.len(), 1);

        let drained = sink.drain();
        assert_eq!(drained[0].item, item);
        assert!(drained[0].error.contains("bad"));
        assert!(sink.is_empty());
    }
}
