//! # Protocol Chains
//!
//! Bridging more than one version step composes hops. A chain applies its hops in
//! a fixed order matching the direction of translation: the state is "version
//! reached so far", each hop is one transition, the chain starts at the source
//! version and ends at the version the far side understands.
//!
//! Spawns walk the chain once so every hop records the entity in the numbering of
//! its own input version and hands the translated type to the next hop.

use crate::core::connection::ConnectionContext;
use crate::core::entity::{EntityId, EntityType, ProtocolVersion};
use crate::core::metadata::MetadataItem;
use crate::error::{Result, RewriteError};
use crate::protocol::hop::ProtocolHop;
use crate::protocol::tracker::HopTrackers;
use crate::utils::metrics::Timer;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Setup-phase view of a chain
#[derive(Debug, Default)]
pub struct ProtocolChainBuilder {
    hops: Vec<Arc<ProtocolHop>>,
}

impl ProtocolChainBuilder {
    /// Append the next hop in translation order
    pub fn push(mut self, hop: impl Into<Arc<ProtocolHop>>) -> Self {
        self.hops.push(hop.into());
        self
    }

    /// Check contiguity and freeze the chain
    ///
    /// Trackers are keyed by [`HopId`](crate::protocol::hop::HopId), so a chain that crosses the same
    /// version pair twice is rejected.
    pub fn build(self) -> Result<ProtocolChain> {
        let first = self.hops.first().ok_or(RewriteError::EmptyChain)?;
        let mut reached = first.from_version();
        let mut seen = HashSet::with_capacity(self.hops.len());

        for hop in &self.hops {
            if hop.from_version() != reached {
                return Err(RewriteError::BrokenChain {
                    expected: reached,
                    found: hop.from_version(),
                });
            }
            if !seen.insert(hop.id()) {
                return Err(RewriteError::DuplicateHop { hop: hop.id() });
            }
            reached = hop.to_version();
        }

        debug!(
            source = %first.from_version(),
            target = %reached,
            hops = self.hops.len(),
            "Protocol chain assembled"
        );

        Ok(ProtocolChain { hops: self.hops })
    }
}

/// Ordered, contiguous sequence of hops
#[derive(Debug, Clone)]
pub struct ProtocolChain {
    hops: Vec<Arc<ProtocolHop>>,
}

impl ProtocolChain {
    pub fn builder() -> ProtocolChainBuilder {
        ProtocolChainBuilder::default()
    }

    /// Version the chain translates from
    pub fn source(&self) -> ProtocolVersion {
        // build() rejects empty chains
        self.hops[0].from_version()
    }

    /// Version the chain translates to
    pub fn target(&self) -> ProtocolVersion {
        self.hops[self.hops.len() - 1].to_version()
    }

    pub fn hops(&self) -> &[Arc<ProtocolHop>] {
        &self.hops
    }

    /// Track a spawned entity at every hop and return its type at the target version
    pub fn on_spawn(
        &self,
        conn: &mut ConnectionContext,
        entity_id: EntityId,
        entity_type: EntityType,
    ) -> EntityType {
        let mut current = entity_type;
        for hop in &self.hops {
            hop.track(conn, entity_id, current.is_object(), current.type_code());
            let next = hop.translate_type(current);
            trace!(
                hop = %hop.id(),
                entity_id,
                from = current.type_code(),
                to = next.type_code(),
                "Entity type translated"
            );
            current = next;
        }
        current
    }

    /// Rewrite one packet's metadata through every hop in order
    pub fn on_metadata(
        &self,
        conn: &ConnectionContext,
        entity_id: EntityId,
        items: Vec<MetadataItem>,
    ) -> Vec<MetadataItem> {
        let _timer = Timer::start("chain_metadata");
        self.hops
            .iter()
            .fold(items, |items, hop| hop.process(conn, entity_id, items))
    }

    /// Forget destroyed entities at every hop
    pub fn on_destroy(&self, conn: &mut ConnectionContext, entity_ids: &[EntityId]) {
        if let Some(trackers) = conn.get_mut::<HopTrackers>() {
            for &id in entity_ids {
                trackers.remove_everywhere(id);
            }
        }
    }
}
