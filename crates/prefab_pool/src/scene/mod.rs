//! Host scene contracts
//!
//! The pool never owns scene objects. It talks to the host engine through three
//! narrow traits:
//!
//! - [`InstanceFactory`]: create and destroy instances of a template
//! - [`ActivationSurface`]: activation flag, placement, parenting, display name
//! - [`KeySource`]: derive the stable base key of a template or instance
//!
//! [`SceneBackend`] bundles the three and is implemented automatically for any
//! type providing all of them. [`SimpleScene`] is an in-memory host used by the
//! demo and the tests.

pub mod simple_scene;

pub use simple_scene::SimpleScene;

use crate::foundation::math::{Quat, Vec3};

slotmap::new_key_type! {
    /// Opaque handle to a scene object owned by the host
    ///
    /// Handles are generational: once the host destroys an object, its handle
    /// never refers to another object again.
    pub struct ObjectId;
}

/// How long an instantiated object lives relative to scene loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceLifetime {
    /// Destroyed by the host when the next scene is loaded
    SceneBound,
    /// Survives scene loads until destroyed explicitly
    Persistent,
}

impl InstanceLifetime {
    /// Lifetime matching a `persistent_instances` configuration flag
    pub fn from_persistent_flag(persistent: bool) -> Self {
        if persistent {
            Self::Persistent
        } else {
            Self::SceneBound
        }
    }
}

/// Object creation and destruction primitives of the host engine
pub trait InstanceFactory {
    /// Create a new instance of `template`
    ///
    /// Returns `None` when the template is not something the host can clone.
    fn instantiate(&mut self, template: ObjectId, lifetime: InstanceLifetime) -> Option<ObjectId>;

    /// Release the engine resources of `object`
    ///
    /// Destroying an already destroyed object is a no-op.
    fn destroy(&mut self, object: ObjectId);
}

/// Per-instance state the pool reads and writes
pub trait ActivationSurface {
    /// Whether the host still knows `object`
    fn is_alive(&self, object: ObjectId) -> bool;

    /// Current activation flag; `false` for dead objects
    fn is_active(&self, object: ObjectId) -> bool;

    /// Enable or disable `object`
    fn set_active(&mut self, object: ObjectId, active: bool);

    /// World position, if the object is alive
    fn position(&self, object: ObjectId) -> Option<Vec3>;

    /// Move `object` in world space
    fn set_position(&mut self, object: ObjectId, position: Vec3);

    /// World rotation, if the object is alive
    fn rotation(&self, object: ObjectId) -> Option<Quat>;

    /// Rotate `object` in world space
    fn set_rotation(&mut self, object: ObjectId, rotation: Quat);

    /// Parent of `object`, if any
    fn parent(&self, object: ObjectId) -> Option<ObjectId>;

    /// Attach `object` under `parent`, or detach it with `None`
    fn set_parent(&mut self, object: ObjectId, parent: Option<ObjectId>);

    /// Display name for diagnostics
    fn name(&self, object: ObjectId) -> Option<&str>;
}

/// Derivation of the base key shared by a template and all its instances
///
/// Implementations must be deterministic and must ignore any uniqueness
/// suffix the host appends to cloned objects.
pub trait KeySource {
    /// Base key of a template or instance; `None` for unknown objects
    fn base_key(&self, object: ObjectId) -> Option<String>;
}

/// Everything the pool manager needs from a host scene
pub trait SceneBackend: InstanceFactory + ActivationSurface + KeySource {}

impl<T> SceneBackend for T where T: InstanceFactory + ActivationSurface + KeySource {}

/// Display label for log messages
pub(crate) fn describe<A: ActivationSurface + ?Sized>(scene: &A, object: ObjectId) -> String {
    match scene.name(object) {
        Some(name) => format!("'{}' ({:?})", name, object),
        None => format!("{:?}", object),
    }
}
