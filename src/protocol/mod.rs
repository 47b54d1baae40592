//! # Rewriting Engine
//!
//! Entity type remapping and metadata rewriting for one or more protocol hops.
//!
//! ## Components
//! - **Tracker**: per-connection `entity id -> classification` records
//! - **Remap**: object/entity type code tables with identity fallback
//! - **Stage**: the field-transform contract hop authors implement
//! - **Isolation**: per-call containment of stage errors and panics
//! - **Pipeline**: ordered stage application over a packet's metadata
//! - **Hop**: one version step bundling tables and stages
//! - **Chain**: contiguous hops applied in translation order
//!
//! ## Flow
//! ```text
//! spawn    -> chain.on_spawn    -> hop k: track(entity, type@vk) -> translate -> type@vk+1
//! metadata -> chain.on_metadata -> hop k: lookup(entity) -> pipeline(stage 1..n) -> items
//! destroy  -> chain.on_destroy  -> every hop forgets the entity
//! ```

pub mod chain;
pub mod hop;
pub mod isolation;
pub mod pipeline;
pub mod remap;
pub mod stage;
pub mod tracker;
