//! Pool error type

use crate::config::ConfigError;
use crate::pool::TemplateId;
use crate::scene::ObjectId;
use thiserror::Error;

/// Errors returned by pool operations
///
/// Most misuse is tolerated by default and only logged; the variants marked
/// *strict* are returned only when the matching
/// [`StrictnessConfig`](crate::config::StrictnessConfig) option is enabled.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool service has not been initialized yet
    #[error("pool manager is not initialized")]
    NotInitialized,

    /// The pool service was initialized twice
    #[error("pool manager is already initialized")]
    AlreadyInitialized,

    /// The host could not derive a base key for the object
    #[error("no template key for object {0:?}")]
    MissingKey(ObjectId),

    /// The template id is unknown, or was invalidated by draining all pools
    #[error("unknown template id {0:?}")]
    UnknownTemplate(TemplateId),

    /// The host could not create an instance of the template
    #[error("host failed to instantiate template '{key}'")]
    InstantiationFailed {
        /// Key of the template that failed
        key: String,
    },

    /// *Strict.* The handle refers to an object the host already destroyed
    #[error("object {object:?} in pool '{key}' was destroyed outside the pool")]
    StaleHandle {
        /// Key of the pool involved
        key: String,
        /// The dead handle
        object: ObjectId,
    },

    /// *Strict.* A despawned handle refers to an object the host already destroyed
    #[error("cannot despawn object {0:?}: it was already destroyed")]
    DeadHandle(ObjectId),

    /// *Strict.* The handle is the template its pool clones from
    #[error("object {object:?} is the template of pool '{key}' and cannot be despawned")]
    TemplateDespawn {
        /// Key of the pool the template belongs to
        key: String,
        /// The template handle
        object: ObjectId,
    },

    /// *Strict.* The handle is already queued in its pool
    #[error("object {object:?} is already despawned into pool '{key}'")]
    DoubleDespawn {
        /// Key of the pool holding the handle
        key: String,
        /// The handle despawned twice
        object: ObjectId,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
