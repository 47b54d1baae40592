//! Entity identity and classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-connection numeric entity identifier as carried on the wire
pub type EntityId = i32;

/// Numeric entity/object type identifier within one protocol version
pub type TypeCode = u16;

/// A wire-protocol revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProtocolVersion(pub u32);

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Classification of a spawned entity.
///
/// Objects and general entities are numbered in two disjoint spaces, so the
/// `is_object` flag decides which remap table a type code is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityType {
    is_object: bool,
    type_code: TypeCode,
}

impl EntityType {
    pub const fn new(is_object: bool, type_code: TypeCode) -> Self {
        Self {
            is_object,
            type_code,
        }
    }

    /// An entity spawned through the object namespace
    pub const fn object(type_code: TypeCode) -> Self {
        Self::new(true, type_code)
    }

    /// An entity spawned through the general entity namespace
    pub const fn entity(type_code: TypeCode) -> Self {
        Self::new(false, type_code)
    }

    pub fn is_object(&self) -> bool {
        self.is_object
    }

    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Same namespace, different code
    pub(crate) fn with_code(self, type_code: TypeCode) -> Self {
        Self { type_code, ..self }
    }
}

/// What a metadata stage knows about the entity whose fields it is rewriting.
///
/// `entity_type` is `None` when metadata arrives for an id the tracker has never
/// seen; stages must treat that as the untyped case rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityContext {
    pub entity_id: EntityId,
    pub entity_type: Option<EntityType>,
}

impl EntityContext {
    pub fn new(entity_id: EntityId, entity_type: Option<EntityType>) -> Self {
        Self {
            entity_id,
            entity_type,
        }
    }

    pub fn is_object(&self) -> bool {
        self.entity_type.map(|t| t.is_object()).unwrap_or(false)
    }

    pub fn type_code(&self) -> Option<TypeCode> {
        self.entity_type.map(|t| t.type_code())
    }

    /// True when the entity is a tracked general entity of the given code
    pub fn is_entity(&self, type_code: TypeCode) -> bool {
        matches!(self.entity_type, Some(t) if !t.is_object() && t.type_code() == type_code)
    }

    /// True when the entity is a tracked object of the given code
    pub fn is_object_of(&self, type_code: TypeCode) -> bool {
        matches!(self.entity_type, Some(t) if t.is_object() && t.type_code() == type_code)
    }
}
