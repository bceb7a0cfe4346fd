//! Window and event loop glue
//!
//! [`ParticleApp`] owns the winit event loop. The window, renderer and
//! orchestrator are created on the first `resumed` event; window events are
//! turned into key routes and input buffer updates, and every redraw runs
//! one orchestrator tick.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::{EngineError, EngineResult};
use crate::gfx::rendering::WgpuRenderer;
use crate::orchestrator::{Control, Orchestrator};
use crate::simulation::BuiltinDemos;

/// Button that pans the camera while held
pub const DRAG_BUTTON: MouseButton = MouseButton::Middle;

pub struct ParticleApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    orchestrator: Option<Orchestrator<WgpuRenderer>>,
    fatal: Option<EngineError>,
}

impl ParticleApp {
    pub fn new(config: ViewerConfig) -> EngineResult<Self> {
        let event_loop = EventLoop::new().map_err(|e| EngineError::EventLoop(e.to_string()))?;
        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                orchestrator: None,
                fatal: None,
            },
        })
    }

    /// Runs until the window closes or a fatal error occurs.
    pub fn run(mut self) -> EngineResult<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.app_state)
            .map_err(|e| EngineError::EventLoop(e.to_string()))?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: EngineError) {
        log::error!("fatal: {error}");
        if let Some(orchestrator) = self.orchestrator.as_mut() {
            orchestrator.shutdown();
        }
        self.orchestrator = None;
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn create_session(&mut self, event_loop: &ActiveEventLoop) -> EngineResult<()> {
        let options = &self.config.window;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(options.title.clone())
                    .with_inner_size(PhysicalSize::new(options.width, options.height)),
            )
            .map_err(|e| EngineError::DeviceInitialization(e.to_string()))?;
        let window = Arc::new(window);
        self.window = Some(Arc::clone(&window));

        let mut orchestrator = Orchestrator::new(
            WgpuRenderer::new(self.config.pacing.vsync),
            window,
            Box::new(BuiltinDemos),
            &self.config,
        );
        orchestrator.startup()?;
        self.orchestrator = Some(orchestrator);
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_session(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(orchestrator) = self.orchestrator.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                orchestrator.resize(width, height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat,
                        ..
                    },
                ..
            } => {
                if repeat {
                    orchestrator.handle_key_repeat(key_code);
                    return;
                }
                match orchestrator.handle_key(key_code) {
                    Ok(Control::Continue) => {}
                    Ok(Control::Exit) => event_loop.exit(),
                    Err(e) => self.fail(event_loop, e),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                orchestrator.input().record(|buffer| match delta {
                    MouseScrollDelta::LineDelta(_, y) => buffer.add_wheel(y),
                    MouseScrollDelta::PixelDelta(position) => {
                        buffer.add_wheel_pixels(position.y as f32)
                    }
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                orchestrator
                    .input()
                    .record(|buffer| buffer.set_pointer(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } if button == DRAG_BUTTON => {
                let held = state == ElementState::Pressed;
                orchestrator
                    .input()
                    .record(|buffer| buffer.set_drag_held(held));
            }
            WindowEvent::RedrawRequested => orchestrator.tick(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(orchestrator) = self.orchestrator.as_mut() {
            orchestrator.shutdown();
            log::info!(
                "session ended after {} non-fatal errors",
                orchestrator.runtime_error_count()
            );
        }
    }
}
