//! Single-template FIFO queue of released instances

use crate::scene::ObjectId;
use std::collections::{HashMap, VecDeque};

/// Counters for one template's pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances created because the queue was empty (or by prewarming)
    pub created: u64,
    /// Spawns served from the queue
    pub reused: u64,
    /// Handles pushed back onto the queue
    pub despawned: u64,
    /// Queued handles destroyed through the pool
    pub destroyed: u64,
    /// Queued handles found already destroyed by the host
    pub stale_discarded: u64,
}

/// Released, inactive instances of one template
///
/// The oldest released instance is handed out first. The queue tolerates the
/// same handle being pushed twice; [`Pool::contains`] lets the manager decide
/// whether to allow it.
#[derive(Debug, Default)]
pub struct Pool {
    key: String,
    template: Option<ObjectId>,
    queue: VecDeque<ObjectId>,
    // Multiplicity of each queued handle, for O(1) double-release checks
    queued: HashMap<ObjectId, u32>,
    stats: PoolStats,
}

impl Pool {
    /// Create an empty pool for `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Template key this pool serves
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Template instances are cloned from, once known
    pub fn template(&self) -> Option<ObjectId> {
        self.template
    }

    pub(crate) fn set_template(&mut self, template: ObjectId) {
        self.template = Some(template);
    }

    /// Number of queued handles, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether `object` is currently queued at least once
    pub fn contains(&self, object: ObjectId) -> bool {
        self.queued.contains_key(&object)
    }

    /// Queued handles, oldest first
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.queue.iter().copied()
    }

    /// Counters for this pool
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Append `object` at the tail
    pub(crate) fn push(&mut self, object: ObjectId) {
        self.queue.push_back(object);
        *self.queued.entry(object).or_insert(0) += 1;
    }

    /// Remove the oldest queued handle
    pub(crate) fn pop(&mut self) -> Option<ObjectId> {
        let object = self.queue.pop_front()?;
        self.forget(object);
        Some(object)
    }

    /// Remove every queued handle matching `predicate`, returning them in queue order
    pub(crate) fn extract_where(&mut self, mut predicate: impl FnMut(ObjectId) -> bool) -> Vec<ObjectId> {
        let mut extracted = Vec::new();
        let mut kept = VecDeque::with_capacity(self.queue.len());

        for object in self.queue.drain(..) {
            if predicate(object) {
                extracted.push(object);
            } else {
                kept.push_back(object);
            }
        }
        self.queue = kept;

        for &object in &extracted {
            self.forget(object);
        }
        extracted
    }

    /// Remove and return everything, oldest first
    pub(crate) fn drain(&mut self) -> Vec<ObjectId> {
        self.queued.clear();
        self.queue.drain(..).collect()
    }

    pub(crate) fn stats_mut(&mut self) -> &mut PoolStats {
        &mut self.stats
    }

    fn forget(&mut self, object: ObjectId) {
        if let Some(count) = self.queued.get_mut(&object) {
            *count -= 1;
            if *count == 0 {
                self.queued.remove(&object);
            }
        }
    }
}
