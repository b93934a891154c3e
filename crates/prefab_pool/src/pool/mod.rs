//! Object pooling
//!
//! - [`queue`]: the FIFO of released instances for one template
//! - [`registry`]: template keys to pools, via [`TemplateId`]
//! - [`manager`]: spawn, despawn and destroy policy
//! - [`service`]: the application's single pool manager slot

pub mod queue;
pub mod registry;
pub mod manager;
pub mod service;

pub use queue::{Pool, PoolStats};
pub use registry::{PoolRegistry, TemplateId};
pub use manager::{PoolManager, PoolManagerStats, SpawnOrigin, SpawnParams, Spawned};
pub use service::PoolService;
