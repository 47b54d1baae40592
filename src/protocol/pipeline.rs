//! # Metadata Pipeline
//!
//! Ordered chain of stages applied to every metadata item of a packet.
//!
//! For each item, stages run in registration order and each sees the result of
//! the ones before it. The first `Drop` ends processing for that item. A stage
//! failure omits the item, is counted, and is reported through the diagnostic sink
//! when verbose diagnostics are enabled; the rest of the batch is unaffected.
//! Survivors keep their relative order and `process` never fails.

use crate::config::DiagnosticsConfig;
use crate::core::entity::EntityContext;
use crate::core::metadata::MetadataItem;
use crate::error::constants;
use crate::protocol::isolation::run_isolated;
use crate::protocol::stage::{MetaStage, StageOutcome};
use crate::utils::diagnostics::{DiagnosticSink, TracingSink};
use crate::utils::metrics::PipelineMetrics;
use std::sync::Arc;
use tracing::{debug, trace};

/// Ordered, append-only list of stages plus failure reporting
pub struct MetadataPipeline {
    stages: Vec<Arc<dyn MetaStage>>,
    diagnostics: DiagnosticsConfig,
    sink: Arc<dyn DiagnosticSink>,
    metrics: Arc<PipelineMetrics>,
}

impl Default for MetadataPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataPipeline {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            diagnostics: DiagnosticsConfig::default(),
            sink: Arc::new(TracingSink),
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Append a stage; it runs after every stage registered before it
    pub fn register_stage<S>(&mut self, stage: S)
    where
        S: MetaStage + 'static,
    {
        self.register_shared(Arc::new(stage));
    }

    /// Append a stage that is also used elsewhere
    pub fn register_shared(&mut self, stage: Arc<dyn MetaStage>) {
        debug!(
            stage = stage.name(),
            position = self.stages.len(),
            "Registered metadata stage"
        );
        self.stages.push(stage);
    }

    pub fn set_diagnostics(&mut self, diagnostics: DiagnosticsConfig) {
        self.diagnostics = diagnostics;
    }

    pub fn set_sink(&mut self, sink: Arc<dyn DiagnosticSink>) {
        self.sink = sink;
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in application order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    /// Rewrite one packet's metadata for the entity described by `ctx`
    pub fn process(&self, ctx: &EntityContext, items: Vec<MetadataItem>) -> Vec<MetadataItem> {
        self.metrics.batch_received(items.len());

        let full_batch = (self.diagnostics.verbose && self.diagnostics.log_full_batch)
            .then(|| items.clone());

        let mut output = Vec::with_capacity(items.len());

        'items: for item in items {
            let mut replacement: Option<MetadataItem> = None;

            for stage in &self.stages {
                let current = replacement.as_ref().unwrap_or(&item);
                match run_isolated(stage.as_ref(), ctx, current) {
                    Ok(StageOutcome::Keep) => {}
                    Ok(StageOutcome::Replace(next)) => replacement = Some(next),
                    Ok(StageOutcome::Drop) => {
                        trace!(
                            entity_id = ctx.entity_id,
                            field_id = item.field_id,
                            stage = stage.name(),
                            "Metadata item dropped"
                        );
                        self.metrics.item_dropped();
                        continue 'items;
                    }
                    Err(error) => {
                        self.metrics.transform_failure();
                        if self.diagnostics.verbose {
                            self.sink
                                .report(constants::MSG_METADATA_FAILURE, &item, &error);
                            if let Some(batch) = &full_batch {
                                debug!(
                                    entity_id = ctx.entity_id,
                                    batch = ?batch,
                                    "{}",
                                    constants::MSG_FULL_BATCH
                                );
                            }
                        }
                        continue 'items;
                    }
                }
            }

            match replacement {
                Some(next) => {
                    self.metrics.item_replaced();
                    output.push(next);
                }
                None => {
                    self.metrics.item_kept();
                    output.push(item);
                }
            }
        }

        output
    }
}

impl std::fmt::Debug for MetadataPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataPipeline")
            .field("stages", &self.stage_names())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}
