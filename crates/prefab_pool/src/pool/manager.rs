//! Pool Manager
//!
//! Recycles deactivated scene objects keyed by their template's base key.
//! Spawning hands back the oldest released instance of a template, or asks
//! the host to instantiate a new one when nothing is queued. Despawning
//! deactivates an instance and queues it for reuse.
//!
//! # Architecture
//!
//! - The manager owns only bookkeeping: a [`PoolRegistry`] of FIFO queues.
//! - Scene objects stay owned by the host. Every operation borrows the host
//!   scene for the duration of the call through [`SceneBackend`].
//! - Handles are checked with [`ActivationSurface::is_alive`] when they leave
//!   a queue, so objects the host destroyed behind the pool's back are
//!   detected instead of handed out.
//!
//! # Usage
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut scene = SimpleScene::new();
//! let enemy = scene.add_template("Enemy", Transform::identity());
//! let mut pools = PoolManager::new();
//!
//! let first = pools.spawn(&mut scene, enemy, SpawnParams::new())?;
//! assert_eq!(first.origin, SpawnOrigin::Created);
//!
//! pools.despawn(&mut scene, first.object)?;
//! let again = pools.spawn(&mut scene, enemy, SpawnParams::at(Vec3::new(0.0, 1.0, 0.0), Quat::identity()))?;
//! assert_eq!(again.object, first.object);
//! assert_eq!(again.origin, SpawnOrigin::Reused);
//! # Ok::<(), prefab_pool::PoolError>(())
//! ```

use super::queue::{Pool, PoolStats};
use super::registry::{PoolRegistry, TemplateId};
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{describe, ActivationSurface, InstanceLifetime, ObjectId, SceneBackend};

/// Placement and activation applied to a spawned object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    /// World position; `None` keeps whatever the object already has
    pub position: Option<Vec3>,
    /// World rotation; `None` keeps whatever the object already has
    pub rotation: Option<Quat>,
    /// Parent to attach under; `None` leaves parenting untouched
    pub parent: Option<ObjectId>,
    /// Activation flag after spawning
    pub active: bool,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            position: None,
            rotation: None,
            parent: None,
            active: true,
        }
    }
}

impl SpawnParams {
    /// Spawn active, keeping the object's current placement
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn active at the given world position and rotation
    pub fn at(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    /// Attach the spawned object under `parent`
    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the activation flag applied after spawning
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    fn apply<S: ActivationSurface + ?Sized>(&self, scene: &mut S, object: ObjectId) {
        if let Some(position) = self.position {
            scene.set_position(object, position);
        }
        if let Some(rotation) = self.rotation {
            scene.set_rotation(object, rotation);
        }
        if self.parent.is_some() {
            scene.set_parent(object, self.parent);
        }
        scene.set_active(object, self.active);
    }
}

/// Where a spawned object came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOrigin {
    /// Taken from the template's pool
    Reused,
    /// Freshly instantiated because the pool was empty
    Created,
}

/// Result of a successful spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    /// The spawned object
    pub object: ObjectId,
    /// Whether it was reused or created
    pub origin: SpawnOrigin,
}

/// Statistics across every pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolManagerStats {
    /// Registered pools
    pub pool_count: usize,
    /// Handles queued across all pools
    pub queued: usize,
    /// Counters summed over current pools and pools removed by drains
    pub totals: PoolStats,
}

/// Manager for per-template pools of reusable scene objects
#[derive(Debug, Default)]
pub struct PoolManager {
    config: PoolConfig,
    registry: PoolRegistry,
    /// Counters of pools removed by `empty_all_pools`
    retired: PoolStats,
}

impl PoolManager {
    /// Create a pool manager with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a pool manager with custom configuration
    pub fn with_config(config: PoolConfig) -> Self {
        log::info!(
            "Pool manager created (persistent instances: {}, strict: {:?})",
            config.persistent_instances,
            config.strict
        );
        Self {
            config,
            registry: PoolRegistry::new(),
            retired: PoolStats::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Assign `template` an id up front, creating its empty pool
    ///
    /// The first live handle registered for a key becomes the pool's template.
    /// Later handles with the same key, such as spawned instances, only take
    /// over once that template has been destroyed.
    pub fn register_template<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &S,
        template: ObjectId,
    ) -> Result<TemplateId, PoolError> {
        let key = scene.base_key(template).ok_or(PoolError::MissingKey(template))?;
        let id = self.registry.get_or_register(&key);
        if let Some(pool) = self.registry.get_mut(id) {
            match pool.template() {
                Some(current) if scene.is_alive(current) => {}
                Some(current) => {
                    log::debug!(
                        "Template {:?} of pool '{}' is gone; cloning from {} instead",
                        current,
                        key,
                        describe(scene, template)
                    );
                    pool.set_template(template);
                }
                None => pool.set_template(template),
            }

            // A template despawned before its pool knew it must never be reused
            if pool.template() == Some(template)
                && !pool.extract_where(|object| object == template).is_empty()
            {
                log::warn!(
                    "Removed template {} from the queue of pool '{}'",
                    describe(scene, template),
                    key
                );
            }
        }
        Ok(id)
    }

    /// Spawn an instance of `template`
    ///
    /// Reuses the oldest queued instance when there is one, otherwise asks
    /// the host for a new instance. `params` is applied in both cases.
    pub fn spawn<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        template: ObjectId,
        params: SpawnParams,
    ) -> Result<Spawned, PoolError> {
        let id = self.register_template(&*scene, template)?;
        self.spawn_registered(scene, id, params)
    }

    /// Spawn an instance of a template registered earlier
    ///
    /// Fails with [`PoolError::UnknownTemplate`] when `id` was invalidated by
    /// [`PoolManager::empty_all_pools`], or when the pool is empty and was only
    /// ever fed by despawns, so there is no template to instantiate from.
    pub fn spawn_by_id<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        id: TemplateId,
        params: SpawnParams,
    ) -> Result<Spawned, PoolError> {
        self.spawn_registered(scene, id, params)
    }

    /// Deactivate `object` and queue it for reuse
    ///
    /// Despawning a dead handle is a no-op unless stale handles are rejected.
    /// Despawning a pool's template is a no-op, with a warning, unless
    /// template despawns are rejected. Despawning a handle that is already
    /// queued queues it again, with a warning, unless double despawns are
    /// rejected.
    pub fn despawn<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        object: ObjectId,
    ) -> Result<(), PoolError> {
        let strict = self.config.strict;
        if !scene.is_alive(object) {
            if strict.reject_stale_handles {
                return Err(PoolError::DeadHandle(object));
            }
            log::debug!("Ignoring despawn of dead object {:?}", object);
            return Ok(());
        }

        let key = scene.base_key(object).ok_or(PoolError::MissingKey(object))?;
        let id = self.registry.get_or_register(&key);
        let pool = self.registry.get_mut(id).ok_or(PoolError::UnknownTemplate(id))?;

        if pool.template() == Some(object) {
            if strict.reject_template_despawn {
                return Err(PoolError::TemplateDespawn { key, object });
            }
            log::warn!(
                "Ignoring despawn of {}: it is the template of pool '{}'",
                describe(&*scene, object),
                key
            );
            return Ok(());
        }

        if pool.contains(object) {
            if strict.reject_double_despawn {
                return Err(PoolError::DoubleDespawn { key, object });
            }
            log::warn!(
                "Object {} despawned twice into pool '{}'; it will be handed out twice",
                describe(&*scene, object),
                key
            );
        }

        scene.set_active(object, false);
        pool.push(object);
        pool.stats_mut().despawned += 1;
        Ok(())
    }

    /// Destroy every queued instance of `template`
    ///
    /// The pool stays registered, empty. Returns the number of objects
    /// destroyed; a template without a pool destroys nothing and does not get
    /// one.
    pub fn destroy_objects_of_type<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        template: ObjectId,
    ) -> Result<usize, PoolError> {
        let key = scene.base_key(template).ok_or(PoolError::MissingKey(template))?;
        let Some(pool) = self.registry.id_of(&key).and_then(|id| self.registry.get_mut(id)) else {
            return Ok(0);
        };

        let queued = pool.drain();
        let destroyed = release_objects(scene, queued, pool.stats_mut());
        log::debug!("Destroyed {} pooled objects of type '{}'", destroyed, key);
        Ok(destroyed)
    }

    /// Destroy every queued instance of every template and forget all pools
    ///
    /// Every [`TemplateId`] issued so far becomes invalid. Returns the number
    /// of objects destroyed; calling it again right away destroys nothing.
    pub fn empty_all_pools<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) -> usize {
        let pools = self.registry.clear();
        let pool_count = pools.len();
        let mut destroyed = 0;

        for mut pool in pools {
            let queued = pool.drain();
            destroyed += release_objects(scene, queued, pool.stats_mut());
            self.retire(pool.stats());
        }

        if pool_count > 0 {
            log::info!("Emptied {} pools, destroying {} objects", pool_count, destroyed);
        }
        destroyed
    }

    /// Instantiate `count` inactive instances of `template` straight into its pool
    ///
    /// `count` is capped at the configured `max_prewarm`. Returns how many
    /// instances were created.
    pub fn prewarm<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        template: ObjectId,
        count: usize,
    ) -> Result<usize, PoolError> {
        let id = self.register_template(&*scene, template)?;
        let count = if count > self.config.max_prewarm {
            log::warn!(
                "Prewarm of {} instances capped at {}",
                count,
                self.config.max_prewarm
            );
            self.config.max_prewarm
        } else {
            count
        };

        for _ in 0..count {
            let object = self.instantiate(scene, id)?;
            scene.set_active(object, false);
            if let Some(pool) = self.registry.get_mut(id) {
                pool.push(object);
            }
        }

        log::debug!("Prewarmed {} instances of {}", count, describe(&*scene, template));
        Ok(count)
    }

    /// Drop queued handles the host has already destroyed
    ///
    /// Returns the number of entries removed.
    pub fn purge_stale<S: SceneBackend + ?Sized>(&mut self, scene: &S) -> usize {
        let mut purged = 0;
        for (_, pool) in self.registry.iter_mut() {
            let stale = pool.extract_where(|object| !scene.is_alive(object));
            if !stale.is_empty() {
                log::debug!("Purged {} stale entries from pool '{}'", stale.len(), pool.key());
                pool.stats_mut().stale_discarded += stale.len() as u64;
                purged += stale.len();
            }
        }
        purged
    }

    /// Number of handles queued for `key`; zero when there is no pool
    pub fn queued_count(&self, key: &str) -> usize {
        self.registry.find(key).map_or(0, Pool::len)
    }

    /// Id assigned to `key`, if it has a pool
    pub fn template_id(&self, key: &str) -> Option<TemplateId> {
        self.registry.id_of(key)
    }

    /// Whether a pool exists for `key`
    pub fn has_pool(&self, key: &str) -> bool {
        self.registry.id_of(key).is_some()
    }

    /// Number of registered pools
    pub fn pool_count(&self) -> usize {
        self.registry.len()
    }

    /// Pool for `key`, for inspection
    pub fn pool(&self, key: &str) -> Option<&Pool> {
        self.registry.find(key)
    }

    /// Counters of the pool for `key`
    pub fn pool_stats(&self, key: &str) -> Option<PoolStats> {
        self.registry.find(key).map(Pool::stats)
    }

    /// Statistics across every pool
    pub fn stats(&self) -> PoolManagerStats {
        let mut totals = self.retired;
        let mut queued = 0;
        for (_, pool) in self.registry.iter() {
            accumulate(&mut totals, pool.stats());
            queued += pool.len();
        }

        PoolManagerStats {
            pool_count: self.registry.len(),
            queued,
            totals,
        }
    }

    fn spawn_registered<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        id: TemplateId,
        params: SpawnParams,
    ) -> Result<Spawned, PoolError> {
        let spawned = match self.take_queued(&*scene, id)? {
            Some(object) => Spawned {
                object,
                origin: SpawnOrigin::Reused,
            },
            None => Spawned {
                object: self.instantiate(scene, id)?,
                origin: SpawnOrigin::Created,
            },
        };

        params.apply(scene, spawned.object);
        Ok(spawned)
    }

    /// Pop the oldest live handle, skipping (or rejecting) dead ones
    fn take_queued<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &S,
        id: TemplateId,
    ) -> Result<Option<ObjectId>, PoolError> {
        let reject_stale = self.config.strict.reject_stale_handles;
        let pool = self.registry.get_mut(id).ok_or(PoolError::UnknownTemplate(id))?;

        while let Some(object) = pool.pop() {
            if scene.is_alive(object) {
                pool.stats_mut().reused += 1;
                return Ok(Some(object));
            }

            pool.stats_mut().stale_discarded += 1;
            log::warn!(
                "Pooled object {:?} of type '{}' was destroyed outside the pool",
                object,
                pool.key()
            );
            if reject_stale {
                return Err(PoolError::StaleHandle {
                    key: pool.key().to_string(),
                    object,
                });
            }
        }

        Ok(None)
    }

    fn instantiate<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        id: TemplateId,
    ) -> Result<ObjectId, PoolError> {
        let lifetime = InstanceLifetime::from_persistent_flag(self.config.persistent_instances);
        let pool = self.registry.get_mut(id).ok_or(PoolError::UnknownTemplate(id))?;
        let template = pool.template().ok_or(PoolError::UnknownTemplate(id))?;

        let object = scene
            .instantiate(template, lifetime)
            .ok_or_else(|| PoolError::InstantiationFailed {
                key: pool.key().to_string(),
            })?;

        pool.stats_mut().created += 1;
        log::trace!("Created new instance {:?} of '{}'", object, pool.key());
        Ok(object)
    }

    fn retire(&mut self, stats: PoolStats) {
        accumulate(&mut self.retired, stats);
    }
}

/// Deactivate and destroy drained handles, counting live ones as destroyed
/// and dead ones (or duplicates already destroyed) as stale
fn release_objects<S: SceneBackend + ?Sized>(
    scene: &mut S,
    objects: Vec<ObjectId>,
    stats: &mut PoolStats,
) -> usize {
    let mut destroyed = 0;
    for object in objects {
        if !scene.is_alive(object) {
            stats.stale_discarded += 1;
            continue;
        }
        if scene.is_active(object) {
            scene.set_active(object, false);
        }
        scene.destroy(object);
        destroyed += 1;
    }
    stats.destroyed += destroyed as u64;
    destroyed
}

fn accumulate(into: &mut PoolStats, from: PoolStats) {
    into.created += from.created;
    into.reused += from.reused;
    into.despawned += from.despawned;
    into.destroyed += from.destroyed;
    into.stale_discarded += from.stale_discarded;
}
