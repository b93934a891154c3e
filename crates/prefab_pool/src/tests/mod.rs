//! Cross-module tests driving the pool manager against the in-memory scene

mod pool_properties;

use crate::foundation::math::Transform;
use crate::scene::{ObjectId, SimpleScene};

/// Scene with an "Enemy" and a "Bullet" template
fn scene_with_templates() -> (SimpleScene, ObjectId, ObjectId) {
    crate::foundation::logging::init_for_tests();

    let mut scene = SimpleScene::new();
    let enemy = scene.add_template("Enemy", Transform::identity());
    let bullet = scene.add_template("Bullet", Transform::identity());
    (scene, enemy, bullet)
}
