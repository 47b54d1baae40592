//! # Entity Type Tracker
//!
//! Per-connection record of which classification each live entity id was spawned
//! with. Metadata packets only carry the entity id, so every hop needs this table
//! to know whether an id is, say, a minecart or a player before rewriting its
//! fields.
//!
//! Records are created on spawn, overwritten when an id is reused, and removed on
//! destroy. A lookup miss is an ordinary outcome (metadata can arrive for an id
//! that was spawned before the engine attached) and is never logged.

use crate::config::TrackerConfig;
use crate::core::entity::{EntityId, EntityType};
use crate::protocol::hop::HopId;
use std::collections::HashMap;
use tracing::{trace, warn};

/// `entity id -> classification` for one connection at one hop
#[derive(Debug)]
pub struct EntityTracker {
    records: HashMap<EntityId, EntityType>,
    warn_threshold: usize,
    warned: bool,
}

impl EntityTracker {
    pub fn new() -> Self {
        Self::with_config(&TrackerConfig::default())
    }

    pub fn with_config(config: &TrackerConfig) -> Self {
        Self {
            records: HashMap::with_capacity(config.initial_capacity),
            warn_threshold: config.warn_threshold,
            warned: false,
        }
    }

    /// Insert or overwrite the record for `entity_id`
    pub fn track(&mut self, entity_id: EntityId, entity_type: EntityType) {
        if let Some(previous) = self.records.insert(entity_id, entity_type) {
            trace!(entity_id, ?previous, ?entity_type, "Entity id reused");
        }

        if !self.warned && self.records.len() > self.warn_threshold {
            self.warned = true;
            warn!(
                tracked = self.records.len(),
                threshold = self.warn_threshold,
                "Entity tracker is unusually large; destroy packets may be going unobserved"
            );
        }
    }

    pub fn lookup(&self, entity_id: EntityId) -> Option<EntityType> {
        self.records.get(&entity_id).copied()
    }

    /// Forget an entity after it was destroyed
    pub fn remove(&mut self, entity_id: EntityId) -> Option<EntityType> {
        self.records.remove(&entity_id)
    }

    /// Forget every entity, e.g. on respawn or world change
    pub fn clear(&mut self) {
        self.records.clear();
        self.warned = false;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn warn_threshold(&self) -> usize {
        self.warn_threshold
    }

    /// Whether the size warning has fired since creation or the last `clear`
    pub fn has_warned(&self) -> bool {
        self.warned
    }
}

impl Default for EntityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Every hop's tracker for one connection.
///
/// Each hop sees entity type codes in its own input version, so a chain of hops
/// keeps one tracker per hop. This is the value a [`ConnectionContext`]
/// carries for the engine.
///
/// [`ConnectionContext`]: crate::core::connection::ConnectionContext
#[derive(Debug, Default)]
pub struct HopTrackers {
    trackers: HashMap<HopId, EntityTracker>,
}

impl HopTrackers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hop: HopId) -> Option<&EntityTracker> {
        self.trackers.get(&hop)
    }

    /// Tracker for `hop`, created from that hop's `config` on first use
    pub fn get_mut(&mut self, hop: HopId, config: &TrackerConfig) -> &mut EntityTracker {
        self.trackers
            .entry(hop)
            .or_insert_with(|| EntityTracker::with_config(config))
    }

    /// Tracker for `hop` only if that hop has tracked something on this connection
    pub fn get_existing_mut(&mut self, hop: HopId) -> Option<&mut EntityTracker> {
        self.trackers.get_mut(&hop)
    }

    /// Remove an entity at every hop
    pub fn remove_everywhere(&mut self, entity_id: EntityId) {
        for tracker in self.trackers.values_mut() {
            tracker.remove(entity_id);
        }
    }
}
