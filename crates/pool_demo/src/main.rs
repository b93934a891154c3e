//! Pool demo application
//!
//! Simulates a few waves of a shooter: bullets and enemies are spawned through
//! the prefab pool, expire, and are despawned back for reuse. Halfway through,
//! a scene transition tears down scene-bound objects so the pool has to cope
//! with handles destroyed behind its back.
//!
//! Usage: `pool_demo [config.toml|config.ron]`

mod waves;

use prefab_pool::foundation::logging;
use prefab_pool::prelude::*;
use waves::{WaveRunner, WaveSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading pool configuration from {}", path);
            PoolConfig::load_from_file(&path)?
        }
        None => PoolConfig::default(),
    };

    let mut scene = SimpleScene::new();
    let mut service = PoolService::new();
    service.initialize(config)?;

    let mut runner = WaveRunner::new(&mut scene, WaveSettings::default());
    runner.prewarm(&mut scene, &mut service)?;

    for wave in 0..runner.settings().waves {
        runner.run_wave(&mut scene, &mut service, wave)?;

        if wave == runner.settings().waves / 2 {
            let destroyed = scene.load_scene();
            log::info!("Scene transition destroyed {} scene-bound objects", destroyed);
            runner.drop_dead(&scene);
            let purged = service.manager_mut()?.purge_stale(&scene);
            log::info!("Purged {} stale pool entries after the transition", purged);
        }
    }

    runner.finish(&mut scene, &mut service)?;
    log::info!(
        "Scene totals: {} instantiated, {} destroyed, {} still alive ({} active)",
        scene.instantiated_count(),
        scene.destroyed_count(),
        scene.live_count(),
        scene.active_count()
    );
    Ok(())
}
