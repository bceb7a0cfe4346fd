//! Renderer contracts
//!
//! [`RenderContext`] is the slice of the renderer that demo modules see: they
//! register particle batches against it, push vertex data and submit draws.
//! [`Renderer`] adds the lifecycle the frame loop drives (initialize against a
//! target surface, camera transforms, begin/end frame, release).

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;

use crate::error::EngineResult;

/// One particle as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    /// World-space center of the particle
    pub position: [f32; 3],
    /// Billboard radius in world units
    pub size: f32,
    /// Linear RGBA color
    pub color: [f32; 4],
}

impl ParticleVertex {
    pub fn new(position: [f32; 3], size: f32, color: [f32; 4]) -> Self {
        Self {
            position,
            size,
            color,
        }
    }

    /// Vertex buffer layout, one vertex per instance
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Opaque handle to a particle batch registered with a render context.
///
/// Handles are only meaningful for the render context that issued them; a
/// re-initialized context starts over with no batches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BatchHandle(pub(crate) u32);

impl BatchHandle {
    /// For [`RenderContext`] implementations numbering their own batches
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Diagnostic rendering toggles
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DisplayFlag {
    /// Whether particle batches are drawn at all
    Particles,
}

/// Current value of every [`DisplayFlag`].
///
/// Flags are operator preferences and survive a render context rebuild.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayFlags {
    particles: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            particles: true,
        }
    }
}

impl DisplayFlags {
    pub fn get(&self, flag: DisplayFlag) -> bool {
        match flag {
            DisplayFlag::Particles => self.particles,
        }
    }

    pub fn set(&mut self, flag: DisplayFlag, value: bool) {
        match flag {
            DisplayFlag::Particles => self.particles = value,
        }
    }
}

/// Drawing surface handed to demo modules
pub trait RenderContext {
    /// Allocates a particle batch able to hold `capacity` particles.
    fn create_batch(&mut self, label: &str, capacity: usize) -> EngineResult<BatchHandle>;

    /// Replaces the contents of a batch. Extra particles beyond the batch
    /// capacity are dropped.
    fn update_batch(&mut self, batch: BatchHandle, particles: &[ParticleVertex])
        -> EngineResult<()>;

    /// Queues a batch for drawing in the current frame.
    fn draw_batch(&mut self, batch: BatchHandle) -> EngineResult<()>;

    fn set_display_flag(&mut self, flag: DisplayFlag, value: bool);

    fn display_flag(&self, flag: DisplayFlag) -> bool;
}

/// Full renderer lifecycle driven by the orchestrator
pub trait Renderer: RenderContext {
    /// Surface the renderer presents to (the application window for the
    /// wgpu backend).
    type Target;

    /// Acquires device and surface resources for `target`.
    ///
    /// Fails with [`EngineError::DeviceInitialization`](crate::error::EngineError::DeviceInitialization)
    /// when the surface or device cannot be acquired.
    fn initialize(&mut self, target: &Self::Target) -> EngineResult<()>;

    fn is_initialized(&self) -> bool;

    /// Pure state update, nothing is submitted to the GPU.
    fn set_view_and_projection(
        &mut self,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        camera_position: [f32; 4],
    );

    fn begin_frame(&mut self) -> EngineResult<()>;

    fn end_frame(&mut self) -> EngineResult<()>;

    /// Tears down every GPU resource. Calling it twice is a no-op.
    fn release(&mut self);

    fn resize(&mut self, _width: u32, _height: u32) {}
}
