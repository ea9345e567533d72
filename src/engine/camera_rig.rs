use glam::{Vec2, Vec3};

use crate::engine::camera::{CameraPose, LiveCamera};

/// Fraction of the remaining distance covered in one frame.
///
/// Frame-rate independent: two frames of `dt` cover the same ground as one of `2*dt`.
/// Always in [0, 1), so a step can never overshoot.
pub fn pull_alpha(rate: f32, dt_sec: f32) -> f32 {
    if !(rate > 0.0) || !(dt_sec > 0.0) {
        return 0.0;
    }
    (1.0 - (-rate * dt_sec).exp()).clamp(0.0, 1.0 - f32::EPSILON)
}

/// Per-frame consumer of the store's pose.
///
/// Holds the live camera and eases it toward the current pose. The pointer
/// nudges the look-at point, scaled by the pose's rotation sensitivity.
#[derive(Debug, Clone)]
pub struct CameraRig {
    live: LiveCamera,
    /// Pointer in normalized device coordinates, each axis in [-1, 1].
    pointer: Vec2,
}

impl CameraRig {
    pub fn new(start: &CameraPose) -> Self {
        Self {
            live: LiveCamera::at(start),
            pointer: Vec2::ZERO,
        }
    }

    pub fn live(&self) -> &LiveCamera {
        &self.live
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = ndc.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Look-at point the rig is heading for, parallax included.
    pub fn goal_target(&self, pose: &CameraPose) -> Vec3 {
        let offset = self.pointer * pose.rotation_sensitivity;
        pose.target + Vec3::new(offset.x, offset.y, 0.0)
    }

    /// Remaining distance to the goal for `pose`.
    pub fn distance_to(&self, pose: &CameraPose) -> f32 {
        self.live
            .distance_to(pose.position, self.goal_target(pose), pose.fov)
    }

    /// Advance one frame.
    pub fn follow(&mut self, pose: &CameraPose, dt_sec: f32) {
        let alpha = pull_alpha(pose.interpolation_rate, dt_sec);
        if alpha <= 0.0 {
            return;
        }

        let goal_target = self.goal_target(pose);
        self.live.position += (pose.position - self.live.position) * alpha;
        self.live.target += (goal_target - self.live.target) * alpha;
        self.live.fov += (pose.fov - self.live.fov) * alpha;
    }
}
