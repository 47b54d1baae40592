//! # Core Data Model
//!
//! In-memory structures the engine operates on. Nothing here is encoded or
//! decoded; the surrounding protocol layer hands these over already parsed.
//!
//! ## Components
//! - **Entity**: entity ids, type codes, classifications, protocol versions
//! - **Metadata**: typed metadata items and their value encodings
//! - **Connection**: per-connection, capability-keyed state store

pub mod connection;
pub mod entity;
pub mod metadata;
