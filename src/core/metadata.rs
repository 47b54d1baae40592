//! # Entity Metadata
//!
//! Decoded, in-memory representation of the variable per-entity fields carried by
//! spawn and update packets. The surrounding decoder produces these; the engine
//! only rewrites them.
//!
//! Each [`MetadataItem`] declares a [`TypeTag`] next to its [`MetaValue`]. The two
//! are kept separately because a version hop may re-tag a field (for example an
//! item-stack encoding change) and the engine must be able to detect a stage that
//! produced a value which contradicts the tag it declared.

use serde::{Deserialize, Serialize};

/// Index of a metadata field within an entity's field table
pub type FieldId = u8;

/// Wire encodings a metadata value can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Byte,
    VarInt,
    Float,
    String,
    Chat,
    Slot,
    Boolean,
    Rotation,
    Position,
    OptPosition,
    Direction,
    OptUuid,
    BlockState,
}

/// Block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Item stack as carried in a slot field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: i32,
    pub count: u8,
    pub damage: i16,
    /// Raw NBT payload, left opaque
    pub nbt: Option<Vec<u8>>,
}

impl ItemStack {
    pub fn new(item_id: i32, count: u8) -> Self {
        Self {
            item_id,
            count,
            damage: 0,
            nbt: None,
        }
    }
}

/// A decoded metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Byte(i8),
    VarInt(i32),
    Float(f32),
    String(String),
    Chat(String),
    Slot(Option<ItemStack>),
    Boolean(bool),
    Rotation([f32; 3]),
    Position(Position),
    OptPosition(Option<Position>),
    Direction(i32),
    OptUuid(Option<u128>),
    BlockState(i32),
}

impl MetaValue {
    /// The tag that naturally describes this value
    pub fn type_tag(&self) -> TypeTag {
        match self {
            MetaValue::Byte(_) => TypeTag::Byte,
            MetaValue::VarInt(_) => TypeTag::VarInt,
            MetaValue::Float(_) => TypeTag::Float,
            MetaValue::String(_) => TypeTag::String,
            MetaValue::Chat(_) => TypeTag::Chat,
            MetaValue::Slot(_) => TypeTag::Slot,
            MetaValue::Boolean(_) => TypeTag::Boolean,
            MetaValue::Rotation(_) => TypeTag::Rotation,
            MetaValue::Position(_) => TypeTag::Position,
            MetaValue::OptPosition(_) => TypeTag::OptPosition,
            MetaValue::Direction(_) => TypeTag::Direction,
            MetaValue::OptUuid(_) => TypeTag::OptUuid,
            MetaValue::BlockState(_) => TypeTag::BlockState,
        }
    }

    /// Integer payload of the numeric id-like encodings
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            MetaValue::Byte(v) => Some(v as i32),
            MetaValue::VarInt(v) | MetaValue::Direction(v) | MetaValue::BlockState(v) => Some(v),
            _ => None,
        }
    }
}

/// One keyed, typed field attached to an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub field_id: FieldId,
    pub type_tag: TypeTag,
    pub value: MetaValue,
}

impl MetadataItem {
    /// Build an item whose tag is derived from its value
    pub fn new(field_id: FieldId, value: MetaValue) -> Self {
        Self {
            field_id,
            type_tag: value.type_tag(),
            value,
        }
    }

    /// Build an item with an explicit tag, which may disagree with the value
    pub fn with_tag(field_id: FieldId, type_tag: TypeTag, value: MetaValue) -> Self {
        Self {
            field_id,
            type_tag,
            value,
        }
    }

    /// Whether the value variant agrees with the declared tag
    pub fn is_consistent(&self) -> bool {
        self.type_tag == self.value.type_tag()
    }

    /// Copy of this item carrying a new value, re-tagged to match it
    pub fn replace_value(&self, value: MetaValue) -> Self {
        Self::new(self.field_id, value)
    }
}
