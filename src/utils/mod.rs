//! # Utility Modules
//!
//! Supporting pieces used by the engine but not part of the rewriting semantics.
//!
//! ## Components
//! - **Diagnostics**: sink receiving per-item transform failures
//! - **Metrics**: thread-safe pipeline counters and an operation timer
//! - **Logging**: optional `tracing-subscriber` installation

pub mod diagnostics;
pub mod logging;
pub mod metrics;

pub use diagnostics::{DiagnosticSink, NullSink, RecordingSink, TracingSink};
pub use logging::init_logging;
pub use metrics::{MetricsSnapshot, PipelineMetrics};
