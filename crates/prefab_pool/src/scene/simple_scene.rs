//! In-memory host scene
//!
//! A minimal scene-object model implementing every host contract the pool
//! needs. Objects live in a slot map so destroyed handles are detected rather
//! than reused. Clones get the engine-style `(Clone)` name suffix, and
//! [`SimpleScene::load_scene`] tears down every scene-bound instance the way a
//! scene transition would.

use super::{ActivationSurface, InstanceFactory, InstanceLifetime, KeySource, ObjectId};
use crate::foundation::math::{Quat, Transform, Vec3};
use slotmap::SlotMap;

/// Suffix appended to the name of every instantiated clone
pub const CLONE_SUFFIX: &str = "(Clone)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Template,
    Instance {
        template: ObjectId,
        lifetime: InstanceLifetime,
    },
}

#[derive(Debug, Clone)]
struct SceneObject {
    name: String,
    transform: Transform,
    parent: Option<ObjectId>,
    active: bool,
    kind: ObjectKind,
}

/// In-memory scene holding templates and their instances
#[derive(Debug, Default)]
pub struct SimpleScene {
    objects: SlotMap<ObjectId, SceneObject>,
    instantiated: u64,
    destroyed: u64,
}

impl SimpleScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template ("prefab") object
    ///
    /// Templates start inactive and are never torn down by scene loads.
    pub fn add_template(&mut self, name: impl Into<String>, transform: Transform) -> ObjectId {
        let name = name.into();
        log::trace!("Registering template '{}'", name);
        self.objects.insert(SceneObject {
            name,
            transform,
            parent: None,
            active: false,
            kind: ObjectKind::Template,
        })
    }

    /// Template an instance was cloned from
    pub fn template_of(&self, object: ObjectId) -> Option<ObjectId> {
        match self.objects.get(object)?.kind {
            ObjectKind::Instance { template, .. } => Some(template),
            ObjectKind::Template => None,
        }
    }

    /// Lifetime an instance was created with; `None` for templates and dead objects
    pub fn lifetime_of(&self, object: ObjectId) -> Option<InstanceLifetime> {
        match self.objects.get(object)?.kind {
            ObjectKind::Instance { lifetime, .. } => Some(lifetime),
            ObjectKind::Template => None,
        }
    }

    /// Load a new scene, destroying every scene-bound instance
    ///
    /// Returns the number of objects destroyed. Templates and persistent
    /// instances survive.
    pub fn load_scene(&mut self) -> usize {
        let doomed: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, object)| {
                matches!(
                    object.kind,
                    ObjectKind::Instance {
                        lifetime: InstanceLifetime::SceneBound,
                        ..
                    }
                )
            })
            .map(|(id, _)| id)
            .collect();

        for &id in &doomed {
            self.destroy(id);
        }

        log::debug!("Scene load destroyed {} scene-bound objects", doomed.len());
        doomed.len()
    }

    /// Number of live objects, templates included
    pub fn live_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of live objects with the activation flag set
    pub fn active_count(&self) -> usize {
        self.objects.values().filter(|object| object.active).count()
    }

    /// Instances created since the scene was built
    pub fn instantiated_count(&self) -> u64 {
        self.instantiated
    }

    /// Objects destroyed since the scene was built
    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }
}

impl InstanceFactory for SimpleScene {
    fn instantiate(&mut self, template: ObjectId, lifetime: InstanceLifetime) -> Option<ObjectId> {
        let source = self.objects.get(template)?;
        let clone = SceneObject {
            name: format!("{}{}", source.name, CLONE_SUFFIX),
            transform: source.transform,
            parent: None,
            active: true,
            kind: ObjectKind::Instance { template, lifetime },
        };

        self.instantiated += 1;
        Some(self.objects.insert(clone))
    }

    fn destroy(&mut self, object: ObjectId) {
        if self.objects.remove(object).is_none() {
            return;
        }
        self.destroyed += 1;

        // Orphan children instead of leaving them pointing at a dead parent
        for child in self.objects.values_mut() {
            if child.parent == Some(object) {
                child.parent = None;
            }
        }
    }
}

impl ActivationSurface for SimpleScene {
    fn is_alive(&self, object: ObjectId) -> bool {
        self.objects.contains_key(object)
    }

    fn is_active(&self, object: ObjectId) -> bool {
        self.objects.get(object).is_some_and(|o| o.active)
    }

    fn set_active(&mut self, object: ObjectId, active: bool) {
        if let Some(o) = self.objects.get_mut(object) {
            o.active = active;
        }
    }

    fn position(&self, object: ObjectId) -> Option<Vec3> {
        self.objects.get(object).map(|o| o.transform.position)
    }

    fn set_position(&mut self, object: ObjectId, position: Vec3) {
        if let Some(o) = self.objects.get_mut(object) {
            o.transform.position = position;
        }
    }

    fn rotation(&self, object: ObjectId) -> Option<Quat> {
        self.objects.get(object).map(|o| o.transform.rotation)
    }

    fn set_rotation(&mut self, object: ObjectId, rotation: Quat) {
        if let Some(o) = self.objects.get_mut(object) {
            o.transform.rotation = rotation;
        }
    }

    fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        self.objects.get(object)?.parent
    }

    fn set_parent(&mut self, object: ObjectId, parent: Option<ObjectId>) {
        let parent = parent.filter(|&p| p != object && self.objects.contains_key(p));
        if let Some(o) = self.objects.get_mut(object) {
            o.parent = parent;
        }
    }

    fn name(&self, object: ObjectId) -> Option<&str> {
        self.objects.get(object).map(|o| o.name.as_str())
    }
}

impl KeySource for SimpleScene {
    fn base_key(&self, object: ObjectId) -> Option<String> {
        let mut name = self.objects.get(object)?.name.as_str();
        while let Some(stripped) = name.strip_suffix(CLONE_SUFFIX) {
            name = stripped.trim_end();
        }
        Some(name.to_string())
    }
}
