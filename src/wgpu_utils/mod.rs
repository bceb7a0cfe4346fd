// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Thin typed wrappers over buffers and textures used by the renderer.

pub mod binding_types;
pub mod depth_texture;
pub mod uniform_buffer;

pub use binding_types::*;
pub use depth_texture::DepthTexture;
pub use uniform_buffer::{UniformBuffer, VertexArrayBuffer};
