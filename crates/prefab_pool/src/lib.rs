//! # Prefab Pool
//!
//! Reusable-object pooling for game scenes. Instead of instantiating and
//! destroying scene objects over and over, released instances are deactivated
//! and queued per template ("prefab"), then handed back out on the next spawn
//! of the same template.
//!
//! ## Features
//!
//! - **FIFO reuse**: the oldest released instance of a template is reused first
//! - **Host agnostic**: the scene is reached through small traits, see [`scene`]
//! - **Arena registry**: templates get generational [`TemplateId`]s
//! - **Configurable strictness**: misuse is logged by default, or rejected
//!
//! ## Quick Start
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! fn main() -> Result<(), PoolError> {
//!     let mut scene = SimpleScene::new();
//!     let bullet = scene.add_template("Bullet", Transform::identity());
//!
//!     let mut service = PoolService::new();
//!     service.initialize(PoolConfig::default())?;
//!
//!     let shot = service.spawn(&mut scene, bullet, SpawnParams::at(Vec3::new(0.0, 1.0, 0.0), Quat::identity()))?;
//!     service.despawn(&mut scene, shot.object)?;
//!
//!     let reused = service.spawn(&mut scene, bullet, SpawnParams::new())?;
//!     assert_eq!(reused.object, shot.object);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod config;
pub mod foundation;
pub mod pool;
pub mod scene;

mod error;

pub use error::PoolError;
pub use pool::{PoolManager, PoolService, SpawnOrigin, SpawnParams, Spawned, TemplateId};
pub use scene::{ObjectId, SceneBackend};

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{PoolConfig, StrictnessConfig},
        foundation::math::{Quat, Transform, Vec3},
        pool::{PoolManager, PoolManagerStats, PoolService, PoolStats, SpawnOrigin, SpawnParams, Spawned, TemplateId},
        scene::{ActivationSurface, InstanceFactory, InstanceLifetime, KeySource, ObjectId, SceneBackend, SimpleScene},
        PoolError,
    };
}

#[cfg(test)]
mod tests;
