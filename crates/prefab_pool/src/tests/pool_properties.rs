//! Reuse, ordering and scoping guarantees of the pool manager

use super::scene_with_templates;
use crate::foundation::math::{utils, Quat, Vec3};
use crate::pool::{PoolManager, SpawnOrigin, SpawnParams};
use crate::scene::{ActivationSurface, KeySource};
use approx::assert_relative_eq;
use std::collections::HashSet;

#[test]
fn test_enemy_scenario() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();

    // Empty pool: a new instance is created, active
    let e1 = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap();
    assert_eq!(e1.origin, SpawnOrigin::Created);
    assert!(scene.is_active(e1.object));

    // Despawn: inactive and queued
    pools.despawn(&mut scene, e1.object).unwrap();
    assert!(!scene.is_active(e1.object));
    assert_eq!(pools.queued_count("Enemy"), 1);

    // Spawn again: same instance back, pool empty
    let again = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap();
    assert_eq!(again.object, e1.object);
    assert_eq!(again.origin, SpawnOrigin::Reused);
    assert!(scene.is_active(again.object));
    assert_eq!(pools.queued_count("Enemy"), 0);

    // Pool drained: a second, distinct instance
    let e2 = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap();
    assert_eq!(e2.origin, SpawnOrigin::Created);
    assert_ne!(e2.object, e1.object);
}

#[test]
fn test_despawned_instances_are_reused_fifo() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();

    let a = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap().object;
    let b = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap().object;
    pools.despawn(&mut scene, a).unwrap();
    pools.despawn(&mut scene, b).unwrap();

    assert_eq!(pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap().object, a);
    assert_eq!(pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap().object, b);
}

#[test]
fn test_reused_instance_takes_new_placement() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();

    let first = pools
        .spawn(&mut scene, enemy, SpawnParams::at(Vec3::new(1.0, 0.0, 0.0), Quat::identity()))
        .unwrap();
    pools.despawn(&mut scene, first.object).unwrap();

    let rotation = utils::yaw_rotation(0.75);
    let again = pools
        .spawn(&mut scene, enemy, SpawnParams::at(Vec3::new(-3.0, 2.0, 8.0), rotation))
        .unwrap();

    assert_eq!(again.origin, SpawnOrigin::Reused);
    assert_eq!(again.object, first.object);
    assert_relative_eq!(scene.position(again.object).unwrap(), Vec3::new(-3.0, 2.0, 8.0));
    assert_relative_eq!(scene.rotation(again.object).unwrap().angle_to(&rotation), 0.0, epsilon = 1e-5);
    assert!(scene.is_active(again.object));
}

#[test]
fn test_reused_instance_can_stay_inactive() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();

    let first = pools
        .spawn(&mut scene, enemy, SpawnParams::at(Vec3::new(5.0, 0.0, 5.0), Quat::identity()))
        .unwrap();
    pools.despawn(&mut scene, first.object).unwrap();

    let again = pools
        .spawn(&mut scene, enemy, SpawnParams::new().with_active(false))
        .unwrap();

    assert_eq!(again.origin, SpawnOrigin::Reused);
    assert!(!scene.is_active(again.object));
    // No placement given: the object keeps where it was released
    assert_relative_eq!(scene.position(again.object).unwrap(), Vec3::new(5.0, 0.0, 5.0));
}

#[test]
fn test_pools_are_isolated_by_template() {
    let (mut scene, enemy, bullet) = scene_with_templates();
    let mut pools = PoolManager::new();

    let enemy_instance = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap().object;
    pools.despawn(&mut scene, enemy_instance).unwrap();

    let shot = pools.spawn(&mut scene, bullet, SpawnParams::new()).unwrap();
    assert_eq!(shot.origin, SpawnOrigin::Created);
    assert_ne!(shot.object, enemy_instance);
    assert_eq!(scene.base_key(shot.object).as_deref(), Some("Bullet"));
    assert_eq!(pools.queued_count("Enemy"), 1);
}

#[test]
fn test_creation_on_miss_never_repeats_a_handle() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();
    let mut seen = HashSet::new();

    for _ in 0..16 {
        let spawned = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap();
        assert_eq!(spawned.origin, SpawnOrigin::Created);
        assert!(seen.insert(spawned.object), "fresh spawn returned a live handle");
    }
}

#[test]
fn test_empty_all_pools_is_idempotent() {
    let (mut scene, enemy, bullet) = scene_with_templates();
    let mut pools = PoolManager::new();

    for template in [enemy, bullet] {
        let spawned = pools.spawn(&mut scene, template, SpawnParams::new()).unwrap();
        pools.despawn(&mut scene, spawned.object).unwrap();
    }
    let live_before = scene.live_count();

    assert_eq!(pools.empty_all_pools(&mut scene), 2);
    assert_eq!(pools.pool_count(), 0);
    assert_eq!(scene.live_count(), live_before - 2);
    let stats_after_first = pools.stats();

    assert_eq!(pools.empty_all_pools(&mut scene), 0);
    assert_eq!(pools.pool_count(), 0);
    assert_eq!(scene.live_count(), live_before - 2);
    assert_eq!(pools.stats(), stats_after_first);
}

#[test]
fn test_empty_all_pools_invalidates_template_ids() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();

    let id = pools.register_template(&scene, enemy).unwrap();
    pools.empty_all_pools(&mut scene);

    assert!(matches!(
        pools.spawn_by_id(&mut scene, id, SpawnParams::new()),
        Err(crate::PoolError::UnknownTemplate(stale)) if stale == id
    ));

    // Spawning by template recreates the pool from scratch
    pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap();
    assert!(pools.has_pool("Enemy"));
    assert_ne!(pools.template_id("Enemy"), Some(id));
}

#[test]
fn test_destroy_objects_of_type_is_scoped() {
    let (mut scene, enemy, bullet) = scene_with_templates();
    let mut pools = PoolManager::new();

    let enemies: Vec<_> = (0..3)
        .map(|_| pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap().object)
        .collect();
    let shot = pools.spawn(&mut scene, bullet, SpawnParams::new()).unwrap().object;
    for &object in enemies.iter().chain(std::iter::once(&shot)) {
        pools.despawn(&mut scene, object).unwrap();
    }

    assert_eq!(pools.destroy_objects_of_type(&mut scene, enemy).unwrap(), 3);

    assert!(pools.has_pool("Enemy"), "pool entry stays registered");
    assert_eq!(pools.queued_count("Enemy"), 0);
    assert_eq!(pools.queued_count("Bullet"), 1);
    assert!(enemies.iter().all(|&object| !scene.is_alive(object)));
    assert!(scene.is_alive(shot));
}

#[test]
fn test_destroy_objects_of_type_without_pool_creates_nothing() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();

    assert_eq!(pools.destroy_objects_of_type(&mut scene, enemy).unwrap(), 0);
    assert!(!pools.has_pool("Enemy"));
    assert_eq!(pools.pool_count(), 0);
}

#[test]
fn test_spawn_by_id_matches_spawn_by_template() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();
    let id = pools.register_template(&scene, enemy).unwrap();

    let created = pools.spawn_by_id(&mut scene, id, SpawnParams::new()).unwrap();
    assert_eq!(created.origin, SpawnOrigin::Created);
    assert_eq!(scene.base_key(created.object).as_deref(), Some("Enemy"));

    pools.despawn(&mut scene, created.object).unwrap();
    let reused = pools.spawn_by_id(&mut scene, id, SpawnParams::new()).unwrap();
    assert_eq!(reused.object, created.object);
    assert_eq!(pools.template_id("Enemy"), Some(id));
}

#[test]
fn test_prewarm_fills_pool_with_inactive_instances() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::new();

    assert_eq!(pools.prewarm(&mut scene, enemy, 5).unwrap(), 5);
    assert_eq!(pools.queued_count("Enemy"), 5);
    assert!(pools
        .pool("Enemy")
        .unwrap()
        .iter()
        .all(|object| !scene.is_active(object)));

    let spawned = pools.spawn(&mut scene, enemy, SpawnParams::new()).unwrap();
    assert_eq!(spawned.origin, SpawnOrigin::Reused);
    assert_eq!(pools.pool_stats("Enemy").unwrap().created, 5);
}

#[test]
fn test_prewarm_is_capped() {
    let (mut scene, enemy, _) = scene_with_templates();
    let mut pools = PoolManager::with_config(crate::config::PoolConfig::new().with_max_prewarm(3));

    assert_eq!(pools.prewarm(&mut scene, enemy, 10).unwrap(), 3);
    assert_eq!(pools.queued_count("Enemy"), 3);
}
