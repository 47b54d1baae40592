//! # Type Remap Tables
//!
//! Old-to-new type code mappings for one protocol hop. Objects and general
//! entities are numbered in disjoint spaces, so a hop carries two independent
//! tables and never cross-maps between them.
//!
//! Tables are filled while a hop is being built and are read-only afterwards.
//! Lookups fall back to the input code: hop authors only register the codes that
//! actually changed between versions, so an unmapped code is not an error.

use crate::core::entity::TypeCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which numbering space a type code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    Object,
    Entity,
}

impl Namespace {
    pub fn of(is_object: bool) -> Self {
        if is_object {
            Namespace::Object
        } else {
            Namespace::Entity
        }
    }
}

/// `old code -> new code` with identity fallback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapTable {
    entries: HashMap<TypeCode, TypeCode>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pairs; later pairs win over earlier ones
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (TypeCode, TypeCode)>,
    {
        let mut table = Self::new();
        for (old, new) in pairs {
            table.insert(old, new);
        }
        table
    }

    /// Register a mapping, overwriting any previous one for `old`
    pub fn insert(&mut self, old: TypeCode, new: TypeCode) {
        if let Some(previous) = self.entries.insert(old, new) {
            if previous != new {
                debug!(old, previous, new, "Remap entry overwritten");
            }
        }
    }

    /// Translated code, or `old` itself when unmapped
    #[inline]
    pub fn translate(&self, old: TypeCode) -> TypeCode {
        self.entries.get(&old).copied().unwrap_or(old)
    }

    /// Whether `old` has an explicit mapping
    pub fn contains(&self, old: TypeCode) -> bool {
        self.entries.contains_key(&old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeCode, TypeCode)> + '_ {
        self.entries.iter().map(|(&old, &new)| (old, new))
    }
}

/// The object and entity tables of one hop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapTables {
    #[serde(default)]
    objects: RemapTable,
    #[serde(default)]
    entities: RemapTable,
}

impl RemapTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_entity_remap(&mut self, old: TypeCode, new: TypeCode) {
        self.entities.insert(old, new);
    }

    pub fn register_object_remap(&mut self, old: TypeCode, new: TypeCode) {
        self.objects.insert(old, new);
    }

    pub fn translate_entity(&self, old: TypeCode) -> TypeCode {
        self.entities.translate(old)
    }

    pub fn translate_object(&self, old: TypeCode) -> TypeCode {
        self.objects.translate(old)
    }

    pub fn translate(&self, namespace: Namespace, old: TypeCode) -> TypeCode {
        self.table(namespace).translate(old)
    }

    pub fn table(&self, namespace: Namespace) -> &RemapTable {
        match namespace {
            Namespace::Object => &self.objects,
            Namespace::Entity => &self.entities,
        }
    }
}
