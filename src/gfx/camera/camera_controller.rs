use cgmath::Vector3;

use super::follow_camera::FollowCamera;

/// Converts per-tick input deltas into camera motion.
///
/// Every motion is scaled by the caller-supplied `dt`, never by a clock read
/// in here, so replaying the same deltas from the same pose gives the same
/// result.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub camera: FollowCamera,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    default_position: Vector3<f32>,
    default_target: Vector3<f32>,
}

impl CameraController {
    pub fn new(
        position: Vector3<f32>,
        target: Vector3<f32>,
        zoom_speed: f32,
        pan_speed: f32,
    ) -> Self {
        Self {
            camera: FollowCamera::new(position, target),
            zoom_speed,
            pan_speed,
            default_position: position,
            default_target: target,
        }
    }

    /// Zooms toward the followed point for positive `delta` (wheel notches),
    /// away from it for negative.
    pub fn apply_wheel(&mut self, delta: f32, dt: f32) {
        if delta == 0.0 {
            return;
        }
        self.camera.zoom(delta * dt * self.zoom_speed);
    }

    /// Pans the camera from a pointer drag of `(dx, dy)` pixels.
    ///
    /// The scene follows the pointer: dragging left moves the camera right,
    /// dragging up (negative screen `dy`) moves it up.
    pub fn apply_drag(&mut self, dx: f32, dy: f32, dt: f32) {
        if dx != 0.0 {
            self.camera.move_right(-dx * dt * self.pan_speed);
        }
        if dy != 0.0 {
            self.camera.move_up(-dy * dt * self.pan_speed);
        }
    }

    /// Restores the default position and look-at target.
    pub fn reset(&mut self) {
        self.camera.set_position(self.default_position);
        self.camera.set_point_to_follow(self.default_target);
    }

    pub fn pose(&self) -> &FollowCamera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;

    fn controller() -> CameraController {
        CameraController::new(Vector3::new(0.0, 0.0, 30.0), Vector3::zero(), 60.0, 3.0)
    }

    #[test]
    fn test_wheel_scales_with_dt() {
        let mut a = controller();
        let mut b = controller();
        a.apply_wheel(1.0, 1.0 / 60.0);
        b.apply_wheel(1.0, 2.0 / 60.0);

        let moved_a = 30.0 - a.camera.distance();
        let moved_b = 30.0 - b.camera.distance();
        assert!((moved_a - 1.0).abs() < 1e-4);
        assert!((moved_b - 2.0 * moved_a).abs() < 1e-4);
    }

    #[test]
    fn test_drag_left_moves_camera_right() {
        let mut c = controller();
        c.apply_drag(-10.0, 0.0, 1.0 / 60.0);
        assert!(c.camera.position.x > 0.0);
        assert!((c.camera.position.x - c.camera.target.x).abs() < 1e-5);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let inputs = [
            (1.0, 0.0, 0.0),
            (0.0, 12.0, -4.0),
            (-2.0, 3.0, 7.0),
            (0.5, -20.0, 1.0),
        ];
        let dt = 1.0 / 60.0;

        let mut a = controller();
        let mut b = controller();
        for (wheel, dx, dy) in inputs {
            a.apply_wheel(wheel, dt);
            a.apply_drag(dx, dy, dt);
        }
        for (wheel, dx, dy) in inputs {
            b.apply_wheel(wheel, dt);
            b.apply_drag(dx, dy, dt);
        }
        assert_eq!(a.camera, b.camera);
    }

    #[test]
    fn test_reset_restores_default_pose() {
        let mut c = controller();
        c.apply_wheel(3.0, 0.1);
        c.apply_drag(40.0, -25.0, 0.1);
        c.reset();
        assert_eq!(c.camera.position, Vector3::new(0.0, 0.0, 30.0));
        assert_eq!(c.camera.target, Vector3::zero());
    }
}
