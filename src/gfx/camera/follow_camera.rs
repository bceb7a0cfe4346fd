//! Camera pose that looks at a followed point
//!
//! The pose is a position, a look-at target and an up vector. Zoom moves the
//! position along the line of sight; panning translates position and target
//! together so the view direction is preserved.

use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Closest the camera may get to the followed point
pub const MIN_FOLLOW_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl FollowCamera {
    pub fn new(position: Vector3<f32>, target: Vector3<f32>) -> Self {
        Self {
            position,
            target,
            up: Vector3::unit_y(),
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn set_point_to_follow(&mut self, target: Vector3<f32>) {
        self.target = target;
    }

    pub fn distance(&self) -> f32 {
        (self.target - self.position).magnitude()
    }

    /// Moves toward the target by `amount` (away from it when negative).
    ///
    /// The camera never gets closer than [`MIN_FOLLOW_DISTANCE`].
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.target - self.position;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return;
        }

        let forward = offset / distance;
        let new_distance = (distance - amount).max(MIN_FOLLOW_DISTANCE);
        self.position = self.target - forward * new_distance;
    }

    /// Translates position and target along the camera's right axis.
    pub fn move_right(&mut self, amount: f32) {
        if let Some((right, _)) = self.local_axes() {
            let movement = right * amount;
            self.position += movement;
            self.target += movement;
        }
    }

    /// Translates position and target along the camera's up axis.
    pub fn move_up(&mut self, amount: f32) {
        if let Some((_, up)) = self.local_axes() {
            let movement = up * amount;
            self.position += movement;
            self.target += movement;
        }
    }

    /// Right and true-up vectors of the current view, `None` when the
    /// pose is degenerate (position on the target or looking along `up`).
    fn local_axes(&self) -> Option<(Vector3<f32>, Vector3<f32>)> {
        let offset = self.target - self.position;
        if offset.magnitude2() <= f32::EPSILON {
            return None;
        }
        let forward = offset.normalize();
        let right = forward.cross(self.up);
        if right.magnitude2() <= f32::EPSILON {
            return None;
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();
        Some((right, up))
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.target),
            self.up,
        )
    }
}

/// Perspective projection, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: Rad<f32>,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Projection {
    pub fn new(fov_y: Rad<f32>, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            z_near,
            z_far,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}
