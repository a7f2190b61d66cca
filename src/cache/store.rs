//! Key-value persistence capability and in-process implementations.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// String key-value storage.
///
/// `set` writes for the current session only; `persist` writes durably where
/// the implementation has a durable layer. `delete` removes from every layer.
/// Writes return `false` when the backing medium rejected them.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn persist(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// In-process map. `persist` behaves like `set`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn persist(&self, key: &str, value: &str) -> bool {
        self.set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key);
        true
    }
}

/// A session layer over an optional durable backend.
///
/// Reads prefer the session layer. Without a backend, `persist` falls back to
/// the session layer.
pub struct LayeredStore {
    session: MemoryStore,
    durable: Option<Arc<dyn KeyValueStore>>,
}

impl LayeredStore {
    pub fn new(durable: Option<Arc<dyn KeyValueStore>>) -> Self {
        Self {
            session: MemoryStore::new(),
            durable,
        }
    }
}

impl KeyValueStore for LayeredStore {
    fn get(&self, key: &str) -> Option<String> {
        self.session
            .get(key)
            .or_else(|| self.durable.as_ref().and_then(|d| d.get(key)))
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.session.set(key, value)
    }

    fn persist(&self, key: &str, value: &str) -> bool {
        match &self.durable {
            Some(durable) => durable.persist(key, value),
            None => self.session.set(key, value),
        }
    }

    fn delete(&self, key: &str) -> bool {
        let session = self.session.delete(key);
        match &self.durable {
            Some(durable) => durable.delete(key) && session,
            None => session,
        }
    }
}
