//! # Graphics
//!
//! - **Camera** ([`camera`]) - follow camera pose, input-driven controller
//!   and the shader-side camera block
//! - **Rendering** ([`rendering`]) - the [`Renderer`] / [`RenderContext`]
//!   contracts and the wgpu particle backend
//!
//! Demo modules only ever see a `&mut dyn RenderContext`. The frame loop
//! drives the full [`Renderer`] lifecycle.
//!
//! [`Renderer`]: rendering::Renderer
//! [`RenderContext`]: rendering::RenderContext

pub mod camera;
pub mod rendering;

pub use camera::{CameraController, FollowCamera, Projection};
pub use rendering::WgpuRenderer;
