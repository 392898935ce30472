//! Callback registries.
//!
//! A `CallbackRegistry` is produced by one serialization. The
//! `RegistryStore` holds the registry of the latest render only: installing
//! a new one discards every key of the previous epoch.

use std::collections::HashMap;

use crate::error::DispatchError;
use crate::key::KeySet;
use crate::node::Callback;

/// Key -> callback map for one render epoch.
#[derive(Debug, Clone, Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, Callback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Callback> {
        self.callbacks.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.callbacks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Callback)> {
        self.callbacks.iter().map(|(key, callback)| (key.as_str(), callback))
    }

    pub(crate) fn insert(&mut self, key: String, callback: Callback) {
        let previous = self.callbacks.insert(key, callback);
        debug_assert!(previous.is_none(), "allocator handed out a registered key");
    }
}

impl KeySet for CallbackRegistry {
    fn contains_key(&self, key: &str) -> bool {
        self.callbacks.contains_key(key)
    }
}

/// Holder of the current registry.
#[derive(Debug, Default)]
pub struct RegistryStore {
    current: CallbackRegistry,
    epoch: u64,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current registry and start a new epoch. Returns the epoch.
    pub fn install(&mut self, registry: CallbackRegistry) -> u64 {
        self.current = registry;
        self.epoch += 1;
        self.epoch
    }

    pub fn resolve(&self, key: &str) -> Result<Callback, DispatchError> {
        self.current
            .get(key)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownEventKey {
                key: key.to_string(),
            })
    }

    pub fn current(&self) -> &CallbackRegistry {
        &self.current
    }

    /// Number of installs so far; 0 before the first render.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
