//! Pool service slot
//!
//! The application's composition root owns one [`PoolService`] and hands out
//! references to it. The slot starts empty, is initialized once at engine
//! startup, and reports [`PoolError::NotInitialized`] for any pool operation
//! before that, which keeps "not ready yet" distinct from "pool empty".

use super::manager::{PoolManager, SpawnParams, Spawned};
use super::registry::TemplateId;
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::scene::{ObjectId, SceneBackend};

/// Single, explicitly constructed home of the application's pool manager
#[derive(Debug, Default)]
pub struct PoolService {
    manager: Option<PoolManager>,
}

impl PoolService {
    /// Create an uninitialized service
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the pool manager
    ///
    /// A second call leaves the existing manager untouched and returns
    /// [`PoolError::AlreadyInitialized`].
    pub fn initialize(&mut self, config: PoolConfig) -> Result<&mut PoolManager, PoolError> {
        if self.manager.is_some() {
            log::warn!("Pool service initialized twice; keeping the existing manager");
            return Err(PoolError::AlreadyInitialized);
        }

        config.validate()?;
        Ok(self.manager.insert(PoolManager::with_config(config)))
    }

    /// Whether [`PoolService::initialize`] has run
    pub fn is_initialized(&self) -> bool {
        self.manager.is_some()
    }

    /// The pool manager
    pub fn manager(&self) -> Result<&PoolManager, PoolError> {
        self.manager.as_ref().ok_or(PoolError::NotInitialized)
    }

    /// The pool manager, mutably
    pub fn manager_mut(&mut self) -> Result<&mut PoolManager, PoolError> {
        self.manager.as_mut().ok_or(PoolError::NotInitialized)
    }

    /// See [`PoolManager::spawn`]
    pub fn spawn<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        template: ObjectId,
        params: SpawnParams,
    ) -> Result<Spawned, PoolError> {
        self.manager_mut()?.spawn(scene, template, params)
    }

    /// See [`PoolManager::spawn_by_id`]
    pub fn spawn_by_id<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        id: TemplateId,
        params: SpawnParams,
    ) -> Result<Spawned, PoolError> {
        self.manager_mut()?.spawn_by_id(scene, id, params)
    }

    /// See [`PoolManager::despawn`]
    pub fn despawn<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        object: ObjectId,
    ) -> Result<(), PoolError> {
        self.manager_mut()?.despawn(scene, object)
    }

    /// See [`PoolManager::destroy_objects_of_type`]
    pub fn destroy_objects_of_type<S: SceneBackend + ?Sized>(
        &mut self,
        scene: &mut S,
        template: ObjectId,
    ) -> Result<usize, PoolError> {
        self.manager_mut()?.destroy_objects_of_type(scene, template)
    }

    /// See [`PoolManager::empty_all_pools`]
    pub fn empty_all_pools<S: SceneBackend + ?Sized>(&mut self, scene: &mut S) -> Result<usize, PoolError> {
        Ok(self.manager_mut()?.empty_all_pools(scene))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrictnessConfig;
    use crate::foundation::math::Transform;
    use crate::scene::{ActivationSurface, SimpleScene};

    #[test]
    fn test_uninitialized_service_fails_soft() {
        let mut scene = SimpleScene::new();
        let enemy = scene.add_template("Enemy", Transform::identity());
        let mut service = PoolService::new();

        assert!(!service.is_initialized());
        assert!(matches!(
            service.spawn(&mut scene, enemy, SpawnParams::new()),
            Err(PoolError::NotInitialized)
        ));
        assert!(matches!(service.despawn(&mut scene, enemy), Err(PoolError::NotInitialized)));
        assert!(matches!(
            service.destroy_objects_of_type(&mut scene, enemy),
            Err(PoolError::NotInitialized)
        ));
        assert!(matches!(service.empty_all_pools(&mut scene), Err(PoolError::NotInitialized)));

        // Nothing was created behind the caller's back
        assert_eq!(scene.instantiated_count(), 0);
        assert!(!scene.is_active(enemy));
    }

    #[test]
    fn test_second_initialize_keeps_first_manager() {
        let mut service = PoolService::new();
        service
            .initialize(PoolConfig::new().with_strictness(StrictnessConfig::strict()))
            .expect("first initialize should succeed");

        let second = service.initialize(PoolConfig::default());
        assert!(matches!(second, Err(PoolError::AlreadyInitialized)));

        let manager = service.manager().expect("manager should exist");
        assert!(manager.config().strict.reject_double_despawn);
    }

    #[test]
    fn test_invalid_config_leaves_service_uninitialized() {
        let mut service = PoolService::new();
        let result = service.initialize(PoolConfig::new().with_max_prewarm(0));

        assert!(matches!(result, Err(PoolError::Config(_))));
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_initialized_service_spawns() {
        let mut scene = SimpleScene::new();
        let enemy = scene.add_template("Enemy", Transform::identity());
        let mut service = PoolService::new();
        service.initialize(PoolConfig::default()).unwrap();

        let spawned = service.spawn(&mut scene, enemy, SpawnParams::new()).unwrap();
        assert!(scene.is_active(spawned.object));

        service.despawn(&mut scene, spawned.object).unwrap();
        assert_eq!(service.manager().unwrap().queued_count("Enemy"), 1);
        assert_eq!(service.empty_all_pools(&mut scene).unwrap(), 1);
    }
}
