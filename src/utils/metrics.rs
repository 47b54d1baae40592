//! Pipeline Metrics
//!
//! Counters describing what the metadata pipeline did with the items it saw.
//! Each hop owns one set; hops are shared across connections, so every counter
//! is an atomic updated with relaxed ordering.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Counters for one metadata pipeline
#[derive(Debug)]
pub struct PipelineMetrics {
    /// Batches handed to `process`
    pub batches: AtomicU64,
    /// Items received across all batches
    pub items_in: AtomicU64,
    /// Items emitted unchanged by every stage
    pub items_kept: AtomicU64,
    /// Items emitted after at least one stage replaced them
    pub items_replaced: AtomicU64,
    /// Items a stage intentionally removed
    pub items_dropped: AtomicU64,
    /// Items omitted because a stage failed on them
    pub transform_failures: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            batches: AtomicU64::new(0),
            items_in: AtomicU64::new(0),
            items_kept: AtomicU64::new(0),
            items_replaced: AtomicU64::new(0),
            items_dropped: AtomicU64::new(0),
            transform_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a batch entering the pipeline
    pub fn batch_received(&self, item_count: usize) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.items_in.fetch_add(item_count as u64, Ordering::Relaxed);
    }

    pub fn item_kept(&self) {
        self.items_kept.fetch_add(1, Ordering::Relaxed);
    }

    pub fn item_replaced(&self) {
        self.items_replaced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn item_dropped(&self) {
        self.items_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transform_failure(&self) {
        self.transform_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            items_in: self.items_in.load(Ordering::Relaxed),
            items_kept: self.items_kept.load(Ordering::Relaxed),
            items_replaced: self.items_replaced.load(Ordering::Relaxed),
            items_dropped: self.items_dropped.load(Ordering::Relaxed),
            transform_failures: self.transform_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self, hop: &str) {
        let snapshot = self.snapshot();
        info!(
            hop,
            batches = snapshot.batches,
            items_in = snapshot.items_in,
            items_kept = snapshot.items_kept,
            items_replaced = snapshot.items_replaced,
            items_dropped = snapshot.items_dropped,
            transform_failures = snapshot.transform_failures,
            uptime_seconds = snapshot.uptime_seconds,
            "Metadata pipeline metrics snapshot"
        );
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches: u64,
    pub items_in: u64,
    pub items_kept: u64,
    pub items_replaced: u64,
    pub items_dropped: u64,
    pub transform_failures: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Items that made it into an output batch
    pub fn items_out(&self) -> u64 {
        self.items_kept + self.items_replaced
    }
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
