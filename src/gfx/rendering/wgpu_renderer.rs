//! wgpu backend for the [`Renderer`] contract
//!
//! All GPU state lives in one [`GpuState`] that is created by `initialize`
//! and dropped by `release`, so a re-initialized renderer never carries
//! buffers over from the previous demo. Display flags live outside it and
//! survive re-initialization.

use std::sync::Arc;

use cgmath::Matrix4;
use winit::window::Window;

use crate::error::{EngineError, EngineResult};
use crate::gfx::camera::CameraUniform;
use crate::wgpu_utils::{uniform_entry, DepthTexture, UniformBuffer, VertexArrayBuffer};

use super::context::{
    BatchHandle, DisplayFlag, DisplayFlags, ParticleVertex, RenderContext, Renderer,
};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// Vertices per particle quad (two triangles)
const QUAD_VERTICES: u32 = 6;

struct ParticleBatch {
    label: String,
    vertices: VertexArrayBuffer<ParticleVertex>,
}

struct FrameInProgress {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    queued: Vec<BatchHandle>,
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: UniformBuffer<CameraUniform>,
    camera_bind_group: wgpu::BindGroup,
    batches: Vec<ParticleBatch>,
    frame: Option<FrameInProgress>,
}

/// Particle renderer presenting to a winit window
pub struct WgpuRenderer {
    gpu: Option<GpuState>,
    flags: DisplayFlags,
    camera: CameraUniform,
    present_mode: wgpu::PresentMode,
}

impl WgpuRenderer {
    /// `vsync` selects FIFO presentation; otherwise frames present
    /// immediately and the pacer alone holds the frame rate.
    pub fn new(vsync: bool) -> Self {
        Self {
            gpu: None,
            flags: DisplayFlags::default(),
            camera: CameraUniform::default(),
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
        }
    }

    fn gpu_mut(&mut self, operation: &str) -> EngineResult<&mut GpuState> {
        self.gpu.as_mut().ok_or_else(|| {
            EngineError::RuntimeStep(format!("{operation} on an uninitialized renderer"))
        })
    }

    async fn create_gpu_state(
        window: Arc<Window>,
        present_mode: wgpu::PresentMode,
    ) -> EngineResult<GpuState> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Particle Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or_else(|| {
                EngineError::DeviceInitialization("surface reports no formats".into())
            })?;
        let present_mode = if capabilities.present_modes.contains(&present_mode) {
            present_mode
        } else {
            wgpu::PresentMode::Fifo
        };
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");

        let camera_buffer = UniformBuffer::<CameraUniform>::new(&device);
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.binding_resource(),
            }],
        });

        let pipeline = create_particle_pipeline(&device, &camera_layout, format);

        Ok(GpuState {
            surface,
            device,
            queue,
            config,
            depth_texture,
            pipeline,
            camera_buffer,
            camera_bind_group,
            batches: Vec::new(),
            frame: None,
        })
    }
}

impl Default for WgpuRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn create_particle_pipeline(
    device: &wgpu::Device,
    camera_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Particle Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/particle.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Particle Pipeline Layout"),
        bind_group_layouts: &[camera_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Particle Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[ParticleVertex::vertex_buffer_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTexture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl RenderContext for WgpuRenderer {
    fn create_batch(&mut self, label: &str, capacity: usize) -> EngineResult<BatchHandle> {
        let gpu = self.gpu.as_mut().ok_or_else(|| {
            EngineError::Initialization(format!("batch '{label}' created before initialize"))
        })?;
        let index = u32::try_from(gpu.batches.len())
            .map_err(|_| EngineError::Initialization("too many particle batches".into()))?;

        gpu.batches.push(ParticleBatch {
            label: label.to_owned(),
            vertices: VertexArrayBuffer::new(&gpu.device, label, capacity),
        });
        log::debug!("batch '{label}' created with capacity {capacity}");
        Ok(BatchHandle(index))
    }

    fn update_batch(
        &mut self,
        batch: BatchHandle,
        particles: &[ParticleVertex],
    ) -> EngineResult<()> {
        let gpu = self.gpu_mut("update_batch")?;
        let entry = gpu
            .batches
            .get_mut(batch.index())
            .ok_or_else(|| EngineError::RuntimeStep(format!("unknown batch {batch:?}")))?;

        let written = entry.vertices.update_data(&gpu.queue, particles);
        if written < particles.len() {
            log::trace!(
                "batch '{}' truncated {} particles",
                entry.label,
                particles.len() - written
            );
        }
        Ok(())
    }

    fn draw_batch(&mut self, batch: BatchHandle) -> EngineResult<()> {
        let gpu = self.gpu_mut("draw_batch")?;
        if batch.index() >= gpu.batches.len() {
            return Err(EngineError::RuntimeStep(format!("unknown batch {batch:?}")));
        }
        let frame = gpu
            .frame
            .as_mut()
            .ok_or_else(|| EngineError::RuntimeStep("draw_batch outside a frame".into()))?;
        frame.queued.push(batch);
        Ok(())
    }

    fn set_display_flag(&mut self, flag: DisplayFlag, value: bool) {
        self.flags.set(flag, value);
    }

    fn display_flag(&self, flag: DisplayFlag) -> bool {
        self.flags.get(flag)
    }
}

impl Renderer for WgpuRenderer {
    type Target = Arc<Window>;

    fn initialize(&mut self, target: &Self::Target) -> EngineResult<()> {
        if self.gpu.is_some() {
            log::debug!("re-initializing renderer without release");
            self.release();
        }
        let state = pollster::block_on(Self::create_gpu_state(
            Arc::clone(target),
            self.present_mode,
        ))?;
        log::debug!(
            "renderer initialized at {}x{} ({:?})",
            state.config.width,
            state.config.height,
            state.config.format
        );
        self.gpu = Some(state);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    fn set_view_and_projection(
        &mut self,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        camera_position: [f32; 4],
    ) {
        self.camera = CameraUniform::new(view, projection, camera_position);
    }

    fn begin_frame(&mut self) -> EngineResult<()> {
        let camera = self.camera;
        let gpu = self.gpu_mut("begin_frame")?;
        if gpu.frame.is_some() {
            return Err(EngineError::RuntimeStep(
                "begin_frame called twice without end_frame".into(),
            ));
        }

        let surface_texture = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Err(EngineError::RuntimeStep(
                    "surface lost; reconfigured, frame skipped".into(),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.camera_buffer.update_content(&gpu.queue, camera);
        gpu.frame = Some(FrameInProgress {
            surface_texture,
            view,
            queued: Vec::new(),
        });
        Ok(())
    }

    fn end_frame(&mut self) -> EngineResult<()> {
        let draw_particles = self.flags.get(DisplayFlag::Particles);
        let gpu = self.gpu_mut("end_frame")?;
        let frame = gpu
            .frame
            .take()
            .ok_or_else(|| EngineError::RuntimeStep("end_frame without begin_frame".into()))?;

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Particle Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if draw_particles {
                render_pass.set_pipeline(&gpu.pipeline);
                render_pass.set_bind_group(0, &gpu.camera_bind_group, &[]);
                for handle in &frame.queued {
                    let Some(batch) = gpu.batches.get(handle.index()) else {
                        continue;
                    };
                    if batch.vertices.is_empty() {
                        continue;
                    }
                    render_pass.set_vertex_buffer(0, batch.vertices.buffer().slice(..));
                    render_pass.draw(0..QUAD_VERTICES, 0..batch.vertices.len() as u32);
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.surface_texture.present();
        Ok(())
    }

    fn release(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            log::debug!("releasing renderer ({} batches)", gpu.batches.len());
            drop(gpu);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if width == 0 || height == 0 {
            return;
        }
        gpu.config.width = width;
        gpu.config.height = height;
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.depth_texture = DepthTexture::new(&gpu.device, &gpu.config, "depth_texture");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_renderer_rejects_frames() {
        let mut renderer = WgpuRenderer::default();
        assert!(!renderer.is_initialized());
        assert!(matches!(
            renderer.begin_frame(),
            Err(EngineError::RuntimeStep(_))
        ));
        assert!(matches!(
            renderer.create_batch("x", 4),
            Err(EngineError::Initialization(_))
        ));
    }

    #[test]
    fn test_release_is_idempotent_and_keeps_flags() {
        let mut renderer = WgpuRenderer::default();
        renderer.set_display_flag(DisplayFlag::Particles, false);
        renderer.release();
        renderer.release();
        assert!(!renderer.display_flag(DisplayFlag::Particles));
    }

    #[test]
    fn test_default_presents_with_vsync() {
        assert_eq!(WgpuRenderer::default().present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(
            WgpuRenderer::new(false).present_mode,
            wgpu::PresentMode::AutoNoVsync
        );
    }
}
