//! # Entity Rewriter
//!
//! Entity type remapping and metadata rewriting for endpoints that speak
//! different, incompatible versions of the same wire protocol.
//!
//! The engine does two things for each connection:
//! - translates numeric entity/object type codes between versions through
//!   per-hop remap tables with identity fallback, and
//! - runs every metadata item of every spawn/update packet through an ordered
//!   list of field-transform stages, omitting (never propagating) any item a
//!   stage fails on.
//!
//! It owns no wire format and does no I/O: it operates on metadata the
//! surrounding decoder has already parsed, and hands the rewritten items back.
//!
//! ## Example
//! ```rust
//! use entity_rewriter::prelude::*;
//!
//! let hop = ProtocolHop::builder(ProtocolVersion(401), ProtocolVersion(393))
//!     .register_entity_remap(50, 10)
//!     .register_fn("drop-field-2", |_, item| {
//!         Ok(if item.field_id == 2 { StageOutcome::Drop } else { StageOutcome::Keep })
//!     })
//!     .build();
//! let chain = ProtocolChain::builder().push(hop).build().unwrap();
//!
//! let mut conn = ConnectionContext::new(1);
//! let spawned = chain.on_spawn(&mut conn, 7, EntityType::entity(50));
//! assert_eq!(spawned.type_code(), 10);
//!
//! let items = vec![
//!     MetadataItem::new(1, MetaValue::VarInt(5)),
//!     MetadataItem::new(2, MetaValue::Boolean(true)),
//! ];
//! let out = chain.on_metadata(&conn, 7, items);
//! assert_eq!(out.len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use config::RewriterConfig;
pub use error::{Result, RewriteError};

/// Commonly used types for hop authors and hosts
pub mod prelude {
    pub use crate::config::{DiagnosticsConfig, RewriterConfig, TrackerConfig};
    pub use crate::core::connection::ConnectionContext;
    pub use crate::core::entity::{EntityContext, EntityId, EntityType, ProtocolVersion, TypeCode};
    pub use crate::core::metadata::{FieldId, ItemStack, MetaValue, MetadataItem, Position, TypeTag};
    pub use crate::error::{Result, RewriteError};
    pub use crate::protocol::chain::ProtocolChain;
    pub use crate::protocol::hop::{HopId, ProtocolHop, ProtocolHopBuilder};
    pub use crate::protocol::pipeline::MetadataPipeline;
    pub use crate::protocol::remap::{Namespace, RemapTable, RemapTables};
    pub use crate::protocol::stage::{stage_fn, MetaStage, StageOutcome};
    pub use crate::protocol::tracker::EntityTracker;
    pub use crate::utils::diagnostics::{DiagnosticSink, NullSink, RecordingSink, TracingSink};
}
