// src/gfx/rendering/mod.rs
//! Rendering contracts and the wgpu particle backend

pub mod context;
pub mod wgpu_renderer;

pub use context::{
    BatchHandle, DisplayFlag, DisplayFlags, ParticleVertex, RenderContext, Renderer,
};
pub use wgpu_renderer::WgpuRenderer;
