//! Template registry
//!
//! Each template key is assigned a [`TemplateId`] the first time it is seen.
//! Pools are stored in a slot map indexed by that id, so the hot spawn path
//! can skip key hashing once a caller holds the id. Ids are generational:
//! after [`PoolRegistry::clear`] an old id never resolves to a new pool.

use super::queue::Pool;
use slotmap::SlotMap;
use std::collections::HashMap;

slotmap::new_key_type! {
    /// Integer identity assigned to a template key
    pub struct TemplateId;
}

/// Mapping from template key to pool
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: SlotMap<TemplateId, Pool>,
    ids: HashMap<String, TemplateId>,
}

impl PoolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `key`, registering an empty pool if the key is new
    pub fn get_or_register(&mut self, key: &str) -> TemplateId {
        if let Some(&id) = self.ids.get(key) {
            return id;
        }

        let id = self.pools.insert(Pool::new(key));
        self.ids.insert(key.to_string(), id);
        log::debug!("Registered pool for template '{}' as {:?}", key, id);
        id
    }

    /// Id for `key` without registering it
    pub fn id_of(&self, key: &str) -> Option<TemplateId> {
        self.ids.get(key).copied()
    }

    /// Pool for `id`
    pub fn get(&self, id: TemplateId) -> Option<&Pool> {
        self.pools.get(id)
    }

    /// Mutable pool for `id`
    pub fn get_mut(&mut self, id: TemplateId) -> Option<&mut Pool> {
        self.pools.get_mut(id)
    }

    /// Pool for `key` without registering it
    pub fn find(&self, key: &str) -> Option<&Pool> {
        self.id_of(key).and_then(|id| self.pools.get(id))
    }

    /// Number of registered pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pool is registered
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// All pools with their ids
    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &Pool)> {
        self.pools.iter()
    }

    /// All pools, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TemplateId, &mut Pool)> {
        self.pools.iter_mut()
    }

    /// Remove every pool and forget every id
    ///
    /// Returns the removed pools so the caller can release what they hold.
    pub fn clear(&mut self) -> Vec<Pool> {
        self.ids.clear();
        self.pools.drain().map(|(_, pool)| pool).collect()
    }
}
