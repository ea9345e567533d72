use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::engine::camera::CameraPose;
use crate::engine::scene::SceneKey;

/// Static mapping from scene to camera vantage point.
///
/// Lookups never fail: anything the table does not know resolves to the
/// default pose, since plenty of content routes have no dedicated vantage.
#[derive(Debug, Clone, Serialize)]
pub struct CameraStateTable {
    default_scene: SceneKey,
    default_pose: CameraPose,
    poses: HashMap<SceneKey, CameraPose>,
}

impl CameraStateTable {
    /// Empty table that resolves everything to `default_pose`.
    pub fn new(default_scene: SceneKey, default_pose: CameraPose) -> Self {
        let mut poses = HashMap::new();
        poses.insert(default_scene, default_pose);
        Self {
            default_scene,
            default_pose,
            poses,
        }
    }

    pub fn with_pose(mut self, key: SceneKey, pose: CameraPose) -> Self {
        if key == self.default_scene {
            self.default_pose = pose;
        }
        self.poses.insert(key, pose);
        self
    }

    pub fn default_scene(&self) -> SceneKey {
        self.default_scene
    }

    pub fn default_pose(&self) -> CameraPose {
        self.default_pose
    }

    pub fn resolve(&self, key: SceneKey) -> CameraPose {
        self.poses.get(&key).copied().unwrap_or(self.default_pose)
    }

    /// Resolve a scene by name; unknown names get the default pose.
    pub fn resolve_name(&self, name: &str) -> CameraPose {
        match name.parse::<SceneKey>() {
            Ok(key) => self.resolve(key),
            Err(_) => self.default_pose,
        }
    }

    /// Entries in `SceneKey::ALL` order.
    pub fn entries(&self) -> Vec<(SceneKey, CameraPose)> {
        SceneKey::ALL
            .into_iter()
            .map(|k| (k, self.resolve(k)))
            .collect()
    }
}

impl Default for CameraStateTable {
    /// Office vantage points.
    fn default() -> Self {
        let home = CameraPose::new(Vec3::new(5.3, 1.2, 11.0), Vec3::new(6.8, 1.4, 6.0), 60.0)
            .with_sensitivity(Vec2::new(0.4, 0.2));

        CameraStateTable::new(SceneKey::Home, home)
            .with_pose(
                SceneKey::Arcade,
                CameraPose::new(Vec3::new(2.8, 1.6, -12.4), Vec3::new(2.8, 1.4, -15.2), 55.0)
                    .with_sensitivity(Vec2::new(0.1, 0.05))
                    .with_rate(6.0),
            )
            .with_pose(
                SceneKey::Stairs,
                CameraPose::new(Vec3::new(4.1, 3.2, -1.8), Vec3::new(8.0, 2.4, -6.2), 60.0)
                    .with_sensitivity(Vec2::new(0.3, 0.15)),
            )
            .with_pose(
                SceneKey::Hoop,
                CameraPose::new(Vec3::new(5.2, 1.6, -13.8), Vec3::new(5.2, 3.3, -17.9), 60.0)
                    .with_sensitivity(Vec2::new(0.05, 0.05))
                    .with_rate(5.0),
            )
            .with_pose(
                SceneKey::Projects,
                CameraPose::new(Vec3::new(7.5, 2.2, -3.6), Vec3::new(7.5, 2.0, -8.0), 50.0)
                    .with_sensitivity(Vec2::new(0.2, 0.1)),
            )
            .with_pose(
                SceneKey::Menu,
                CameraPose::new(Vec3::new(6.0, 2.8, -2.0), Vec3::new(3.4, 2.2, -6.6), 65.0)
                    .with_sensitivity(Vec2::new(0.25, 0.1))
                    .with_rate(3.0),
            )
    }
}
