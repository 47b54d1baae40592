//! # Protocol Hops
//!
//! One version-to-version translation step. A hop bundles the object/entity remap
//! tables for its version pair with the metadata stages it contributes.
//!
//! Hops are assembled with a [`ProtocolHopBuilder`] during startup. `build()`
//! freezes the tables and the stage list; the resulting [`ProtocolHop`] is
//! immutable and meant to be shared through `Arc` by every connection that
//! crosses it, so no locking is needed on the packet path.
//!
//! Per-connection state (the entity tracker for this hop) lives in the
//! connection's [`ConnectionContext`], never in the hop.

use crate::config::{DiagnosticsConfig, TrackerConfig};
use crate::core::connection::ConnectionContext;
use crate::core::entity::{EntityContext, EntityId, EntityType, ProtocolVersion, TypeCode};
use crate::core::metadata::MetadataItem;
use crate::error::Result;
use crate::protocol::pipeline::MetadataPipeline;
use crate::protocol::remap::{Namespace, RemapTables};
use crate::protocol::stage::{stage_fn, MetaStage, StageOutcome};
use crate::protocol::tracker::{EntityTracker, HopTrackers};
use crate::utils::diagnostics::DiagnosticSink;
use crate::utils::metrics::PipelineMetrics;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Identifies a hop by the versions it bridges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HopId {
    pub from: ProtocolVersion,
    pub to: ProtocolVersion,
}

impl HopId {
    pub fn new(from: ProtocolVersion, to: ProtocolVersion) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for HopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Setup-phase view of a hop
pub struct ProtocolHopBuilder {
    id: HopId,
    remaps: RemapTables,
    pipeline: MetadataPipeline,
    tracker: TrackerConfig,
}

impl ProtocolHopBuilder {
    pub fn new(from: ProtocolVersion, to: ProtocolVersion) -> Self {
        Self {
            id: HopId::new(from, to),
            remaps: RemapTables::new(),
            pipeline: MetadataPipeline::new(),
            tracker: TrackerConfig::default(),
        }
    }

    pub fn register_entity_remap(mut self, old: TypeCode, new: TypeCode) -> Self {
        self.remaps.register_entity_remap(old, new);
        self
    }

    pub fn register_object_remap(mut self, old: TypeCode, new: TypeCode) -> Self {
        self.remaps.register_object_remap(old, new);
        self
    }

    /// Replace both tables at once, e.g. with tables loaded from mapping data
    pub fn remaps(mut self, remaps: RemapTables) -> Self {
        self.remaps = remaps;
        self
    }

    pub fn register_stage<S>(mut self, stage: S) -> Self
    where
        S: MetaStage + 'static,
    {
        self.pipeline.register_stage(stage);
        self
    }

    /// Register a closure as a named stage
    pub fn register_fn<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&EntityContext, &MetadataItem) -> Result<StageOutcome> + Send + Sync + 'static,
    {
        self.register_stage(stage_fn(name, f))
    }

    pub fn register_shared(mut self, stage: Arc<dyn MetaStage>) -> Self {
        self.pipeline.register_shared(stage);
        self
    }

    pub fn diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.pipeline.set_diagnostics(diagnostics);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.pipeline.set_sink(sink);
        self
    }

    pub fn tracker_config(mut self, tracker: TrackerConfig) -> Self {
        self.tracker = tracker;
        self
    }

    /// Freeze the hop; nothing about it changes afterwards
    pub fn build(self) -> ProtocolHop {
        info!(
            hop = %self.id,
            entity_remaps = self.remaps.table(Namespace::Entity).len(),
            object_remaps = self.remaps.table(Namespace::Object).len(),
            stages = self.pipeline.len(),
            "Protocol hop ready"
        );
        ProtocolHop {
            id: self.id,
            remaps: self.remaps,
            pipeline: self.pipeline,
            tracker: self.tracker,
        }
    }
}

/// An immutable version-to-version translation step
pub struct ProtocolHop {
    id: HopId,
    remaps: RemapTables,
    pipeline: MetadataPipeline,
    tracker: TrackerConfig,
}

impl ProtocolHop {
    pub fn builder(from: ProtocolVersion, to: ProtocolVersion) -> ProtocolHopBuilder {
        ProtocolHopBuilder::new(from, to)
    }

    pub fn id(&self) -> HopId {
        self.id
    }

    pub fn from_version(&self) -> ProtocolVersion {
        self.id.from
    }

    pub fn to_version(&self) -> ProtocolVersion {
        self.id.to
    }

    pub fn remaps(&self) -> &RemapTables {
        &self.remaps
    }

    pub fn pipeline(&self) -> &MetadataPipeline {
        &self.pipeline
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        self.pipeline.metrics()
    }

    pub fn translate_entity(&self, old: TypeCode) -> TypeCode {
        self.remaps.translate_entity(old)
    }

    pub fn translate_object(&self, old: TypeCode) -> TypeCode {
        self.remaps.translate_object(old)
    }

    /// Translate a classification into this hop's output version
    pub fn translate_type(&self, entity_type: EntityType) -> EntityType {
        let ns = Namespace::of(entity_type.is_object());
        entity_type.with_code(self.remaps.translate(ns, entity_type.type_code()))
    }

    /// This hop's tracker on `conn`, created on first use
    pub fn tracker_mut<'a>(&self, conn: &'a mut ConnectionContext) -> &'a mut EntityTracker {
        conn.get_or_insert_with(HopTrackers::new)
            .get_mut(self.id, &self.tracker)
    }

    pub fn tracker<'a>(&self, conn: &'a ConnectionContext) -> Option<&'a EntityTracker> {
        conn.get::<HopTrackers>().and_then(|t| t.get(self.id))
    }

    /// Record the classification an entity was spawned with at this hop's input version
    pub fn track(
        &self,
        conn: &mut ConnectionContext,
        entity_id: EntityId,
        is_object: bool,
        type_code: TypeCode,
    ) {
        self.tracker_mut(conn)
            .track(entity_id, EntityType::new(is_object, type_code));
    }

    pub fn lookup(&self, conn: &ConnectionContext, entity_id: EntityId) -> Option<EntityType> {
        self.tracker(conn).and_then(|t| t.lookup(entity_id))
    }

    pub fn untrack(&self, conn: &mut ConnectionContext, entity_id: EntityId) -> Option<EntityType> {
        conn.get_mut::<HopTrackers>()
            .and_then(|t| t.get_existing_mut(self.id))
            .and_then(|t| t.remove(entity_id))
    }

    /// Outgoing type code for a tracked entity; `original` when the entity is unknown
    pub fn resolve_outgoing_type_code(
        &self,
        conn: &ConnectionContext,
        entity_id: EntityId,
        original: TypeCode,
    ) -> TypeCode {
        match self.lookup(conn, entity_id) {
            Some(entity_type) => self.translate_type(entity_type).type_code(),
            None => original,
        }
    }

    /// Rewrite one packet's metadata for `entity_id`
    #[instrument(level = "trace", skip(self, conn, items), fields(hop = %self.id, count = items.len()))]
    pub fn process(
        &self,
        conn: &ConnectionContext,
        entity_id: EntityId,
        items: Vec<MetadataItem>,
    ) -> Vec<MetadataItem> {
        let ctx = EntityContext::new(entity_id, self.lookup(conn, entity_id));
        let out = self.pipeline.process(&ctx, items);
        debug!(hop = %self.id, entity_id, surviving = out.len(), "Metadata rewritten");
        out
    }
}

impl fmt::Debug for ProtocolHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolHop")
            .field("id", &self.id)
            .field("remaps", &self.remaps)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
