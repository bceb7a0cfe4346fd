pub mod camera_controller;
pub mod camera_utils;
pub mod follow_camera;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::{to_shader_position, CameraUniform};
pub use follow_camera::{FollowCamera, Projection};
