//! Wave simulation
//!
//! Each wave spawns a burst of enemies and bullets at random positions. Every
//! spawned object gets a lifetime in ticks; expired objects are despawned
//! back into their pool.

use prefab_pool::foundation::math::utils;
use prefab_pool::prelude::*;
use rand::prelude::*;

/// Wave tuning
#[derive(Debug, Clone)]
pub struct WaveSettings {
    /// Number of waves to run
    pub waves: u32,
    /// Simulation ticks per wave
    pub ticks_per_wave: u32,
    /// Enemies spawned at the start of a wave
    pub enemies_per_wave: u32,
    /// Bullets fired each tick
    pub bullets_per_tick: u32,
    /// Bullet lifetime range, in ticks
    pub bullet_lifetime: std::ops::Range<u32>,
    /// Bullets created ahead of the first wave
    pub prewarmed_bullets: usize,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            waves: 4,
            ticks_per_wave: 30,
            enemies_per_wave: 8,
            bullets_per_tick: 6,
            bullet_lifetime: 3..12,
            prewarmed_bullets: 32,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Live {
    object: ObjectId,
    ticks_left: u32,
}

/// Drives spawn/despawn traffic through a pool service
pub struct WaveRunner {
    settings: WaveSettings,
    enemy: ObjectId,
    bullet: ObjectId,
    live: Vec<Live>,
    rng: ThreadRng,
}

impl WaveRunner {
    /// Register the demo templates in `scene`
    pub fn new(scene: &mut SimpleScene, settings: WaveSettings) -> Self {
        let enemy = scene.add_template(
            "Enemy",
            Transform::from_position_rotation(Vec3::new(0.0, 10.0, 0.0), utils::yaw_rotation(std::f32::consts::PI)),
        );
        let bullet = scene.add_template("Bullet", Transform::identity());
        Self {
            settings,
            enemy,
            bullet,
            live: Vec::new(),
            rng: thread_rng(),
        }
    }

    /// Wave tuning in use
    pub fn settings(&self) -> &WaveSettings {
        &self.settings
    }

    /// Fill the bullet pool before the first wave
    pub fn prewarm(&mut self, scene: &mut SimpleScene, service: &mut PoolService) -> Result<(), PoolError> {
        let created = service
            .manager_mut()?
            .prewarm(scene, self.bullet, self.settings.prewarmed_bullets)?;
        log::info!("Prewarmed {} bullets", created);
        Ok(())
    }

    /// Run one wave to completion
    pub fn run_wave(
        &mut self,
        scene: &mut SimpleScene,
        service: &mut PoolService,
        wave: u32,
    ) -> Result<(), PoolError> {
        for _ in 0..self.settings.enemies_per_wave {
            let position = Vec3::new(
                self.rng.gen_range(-20.0..20.0),
                10.0,
                self.rng.gen_range(-20.0..20.0),
            );
            let ticks_left = self.settings.ticks_per_wave;
            self.spawn(scene, service, self.enemy, position, ticks_left)?;
        }

        for _ in 0..self.settings.ticks_per_wave {
            for _ in 0..self.settings.bullets_per_tick {
                let position = Vec3::new(self.rng.gen_range(-5.0..5.0), 0.0, 0.0);
                let ticks_left = self.rng.gen_range(self.settings.bullet_lifetime.clone());
                self.spawn(scene, service, self.bullet, position, ticks_left)?;
            }
            self.tick(scene, service)?;
        }

        let stats = service.manager()?.stats();
        log::info!(
            "Wave {}: {} created, {} reused, {} queued across {} pools, {} live objects",
            wave,
            stats.totals.created,
            stats.totals.reused,
            stats.queued,
            stats.pool_count,
            self.live.len()
        );
        Ok(())
    }

    /// Forget tracked objects the scene has destroyed
    pub fn drop_dead(&mut self, scene: &SimpleScene) -> usize {
        let before = self.live.len();
        self.live.retain(|live| scene.is_alive(live.object));
        before - self.live.len()
    }

    /// Despawn everything still alive, then drop the pools
    pub fn finish(&mut self, scene: &mut SimpleScene, service: &mut PoolService) -> Result<(), PoolError> {
        for live in std::mem::take(&mut self.live) {
            service.despawn(scene, live.object)?;
        }

        let bullets = service.destroy_objects_of_type(scene, self.bullet)?;
        log::info!("Destroyed {} pooled bullets", bullets);

        let remaining = service.empty_all_pools(scene)?;
        log::info!("Emptied all pools, destroying {} remaining objects", remaining);

        let stats = service.manager()?.stats();
        log::info!("Final pool statistics: {:?}", stats.totals);
        Ok(())
    }

    fn spawn(
        &mut self,
        scene: &mut SimpleScene,
        service: &mut PoolService,
        template: ObjectId,
        position: Vec3,
        ticks_left: u32,
    ) -> Result<(), PoolError> {
        let spawned = service.spawn(scene, template, SpawnParams::at(position, Quat::identity()))?;
        self.live.push(Live {
            object: spawned.object,
            ticks_left,
        });
        Ok(())
    }

    fn tick(&mut self, scene: &mut SimpleScene, service: &mut PoolService) -> Result<(), PoolError> {
        let mut expired = Vec::new();
        self.live.retain_mut(|live| {
            live.ticks_left = live.ticks_left.saturating_sub(1);
            if live.ticks_left == 0 {
                expired.push(live.object);
                false
            } else {
                true
            }
        });

        for object in expired {
            service.despawn(scene, object)?;
        }
        Ok(())
    }
}
