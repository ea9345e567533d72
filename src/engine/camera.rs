use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera vantage point for one scene.
///
/// Poses are looked up from the camera state table and never mutated in place;
/// the live camera moves toward them instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// How far (in world units) the look-at point follows the pointer, per axis.
    pub rotation_sensitivity: Vec2,
    /// Exponential smoothing rate (1/s). Higher converges faster.
    pub interpolation_rate: f32,
}

impl CameraPose {
    pub const fn new(position: Vec3, target: Vec3, fov: f32) -> Self {
        Self {
            position,
            target,
            fov,
            rotation_sensitivity: Vec2::new(0.3, 0.15),
            interpolation_rate: 4.0,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: Vec2) -> Self {
        self.rotation_sensitivity = sensitivity;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.interpolation_rate = rate;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.target.is_finite()
            && self.fov.is_finite()
            && self.rotation_sensitivity.is_finite()
            && self.interpolation_rate.is_finite()
    }
}

/// The camera transform that actually gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
}

impl LiveCamera {
    /// Place the camera exactly on a pose (used at startup, no interpolation).
    pub fn at(pose: &CameraPose) -> Self {
        Self {
            position: pose.position,
            target: pose.target,
            fov: pose.fov,
        }
    }

    /// Combined distance to a goal: position, look-at and fov gaps.
    pub fn distance_to(&self, position: Vec3, target: Vec3, fov: f32) -> f32 {
        self.position.distance(position) + self.target.distance(target) + (self.fov - fov).abs()
    }

    /// Right-handed view matrix, column-major.
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        glam::Mat4::look_at_rh(self.position, self.target, Vec3::Y).to_cols_array_2d()
    }
}

impl Default for LiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 5.0),
            target: Vec3::ZERO,
            fov: 60.0,
        }
    }
}
