//! Connection-scoped state.
//!
//! A [`ConnectionContext`] is created when a connection is established and
//! dropped when it tears down. Collaborators attach per-connection state to it by
//! type, the same way the engine attaches its entity trackers. Nothing stored here
//! is shared across connections.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use tracing::debug;

/// Per-connection, capability-keyed state store
pub struct ConnectionContext {
    id: u64,
    storage: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl ConnectionContext {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            storage: HashMap::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Attach a value, returning the one it replaced
    pub fn insert<T: Any + Send>(&mut self, value: T) -> Option<T> {
        self.storage
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any + Send>(&self) -> Option<&T> {
        self.storage
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.storage
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    pub fn contains<T: Any + Send>(&self) -> bool {
        self.storage.contains_key(&TypeId::of::<T>())
    }

    pub fn remove<T: Any + Send>(&mut self) -> Option<T> {
        self.storage
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    /// Fetch a value, creating it on first use
    pub fn get_or_insert_with<T, F>(&mut self, init: F) -> &mut T
    where
        T: Any + Send,
        F: FnOnce() -> T,
    {
        let id = self.id;
        let slot = self.storage.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(
                connection = id,
                state = std::any::type_name::<T>(),
                "Attaching connection state"
            );
            Box::new(init())
        });
        match slot.downcast_mut::<T>() {
            Some(value) => value,
            // Keyed by TypeId::of::<T>, so the entry always holds a T
            None => unreachable!("connection storage entry does not match its TypeId"),
        }
    }
}

impl std::fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("id", &self.id)
            .field("entries", &self.storage.len())
            .finish()
    }
}
