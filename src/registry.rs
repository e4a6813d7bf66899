//! Keyed collection of graph stores, one per diagram on screen.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use crate::error::{EntityKind, GraphError, Result};
use crate::store::GraphStore;

#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: HashMap<String, GraphStore>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store under `key`, replacing any store already there.
    pub fn create(&mut self, key: impl Into<String>) -> &mut GraphStore {
        match self.stores.entry(key.into()) {
            Entry::Occupied(mut entry) => {
                warn!(key = %entry.key(), "replacing existing store");
                entry.insert(GraphStore::new());
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                debug!(key = %entry.key(), "create store");
                entry.insert(GraphStore::new())
            }
        }
    }

    pub fn get(&self, key: &str) -> Result<&GraphStore> {
        self.stores
            .get(key)
            .ok_or_else(|| GraphError::not_found(EntityKind::Store, key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut GraphStore> {
        self.stores
            .get_mut(key)
            .ok_or_else(|| GraphError::not_found(EntityKind::Store, key))
    }

    /// Tears down the store under `key` and hands it back.
    pub fn remove(&mut self, key: &str) -> Result<GraphStore> {
        debug!(key = %key, "remove store");
        self.stores
            .remove(key)
            .ok_or_else(|| GraphError::not_found(EntityKind::Store, key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.stores.contains_key(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.stores.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Node;

    #[test]
    fn create_get_remove() {
        let mut registry = StoreRegistry::new();
        registry
            .create("canvas-1")
            .add_node(Node::new("a", 0.0, 0.0, 10.0, 10.0))
            .unwrap();
        registry.create("canvas-2");

        assert_eq!(registry.keys(), vec!["canvas-1", "canvas-2"]);
        assert_eq!(registry.get("canvas-1").unwrap().node_count(), 1);

        let removed = registry.remove("canvas-1").unwrap();
        assert_eq!(removed.node_count(), 1);
        assert!(!registry.contains("canvas-1"));
    }

    #[test]
    fn unknown_key_is_not_found() {
        let mut registry = StoreRegistry::new();
        assert!(matches!(
            registry.get("missing"),
            Err(GraphError::NotFound { kind: EntityKind::Store, .. })
        ));
        assert!(registry.get_mut("missing").is_err());
        assert!(registry.remove("missing").is_err());
    }

    #[test]
    fn create_replaces_existing_store() {
        let mut registry = StoreRegistry::new();
        registry
            .create("canvas")
            .add_node(Node::new("a", 0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let fresh = registry.create("canvas");
        assert!(fresh.is_empty());
    }
}
