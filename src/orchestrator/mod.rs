//! # Frame orchestration
//!
//! [`Orchestrator`] owns the active demo, the renderer, the camera
//! controller and the pacer, and drives them one [`tick`](Orchestrator::tick)
//! at a time. It also owns the playback state machine (running, paused,
//! single step) and the demo swap sequence.
//!
//! Within one tick the camera is always updated before the demo advances,
//! and the demo always advances before anything is drawn. The renderer is
//! never asked for a frame while it is uninitialized, and a demo that is
//! being swapped out is never advanced, drawn or bound again.

pub mod input;
pub mod routing;

pub use input::{FrameDeltas, InputDeltaBuffer, SharedInputBuffer};
pub use routing::{InputRouter, Route};

use cgmath::{Rad, Vector3};
use winit::keyboard::KeyCode;

use crate::config::{KeyAction, ViewerConfig};
use crate::error::{EngineError, EngineResult};
use crate::gfx::camera::{to_shader_position, CameraController, Projection};
use crate::gfx::rendering::{DisplayFlag, Renderer};
use crate::performance::{FrameStats, Pacer};
use crate::simulation::{DemoFactory, DemoKind, DemoSlot};

const PHASE_RELEASE_DEMO: &str = "Release demo";
const PHASE_RELEASE_RENDERING: &str = "Release rendering";
const PHASE_INIT_DEMO: &str = "Init demo";
const PHASE_INIT_RENDERING: &str = "Init rendering";
const PHASE_BIND_DEMO: &str = "Bind demo";
const PHASE_RENDERER: &str = "Renderer";

/// Pause/step state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub paused: bool,
    /// Set by a step command while paused, consumed by the next advance
    pub step_pending: bool,
}

impl PlaybackState {
    pub fn is_running(&self) -> bool {
        !self.paused
    }

    /// Whether the next tick advances the demo
    pub fn should_advance(&self) -> bool {
        !self.paused || self.step_pending
    }
}

/// What the window layer should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Frame loop and demo lifecycle owner
pub struct Orchestrator<R: Renderer> {
    renderer: R,
    target: R::Target,
    slot: DemoSlot,
    factory: Box<dyn DemoFactory>,
    startup_demo: DemoKind,

    camera: CameraController,
    projection: Projection,
    fixed_dt: f32,

    playback: PlaybackState,
    router: InputRouter,
    input: SharedInputBuffer,

    pacer: Pacer,
    stats: FrameStats,
    runtime_errors: u64,
    started: bool,
}

impl<R: Renderer> Orchestrator<R> {
    /// Builds an orchestrator around `renderer`, presenting to `target`.
    ///
    /// Nothing is initialized until [`startup`](Self::startup).
    pub fn new(
        renderer: R,
        target: R::Target,
        factory: Box<dyn DemoFactory>,
        config: &ViewerConfig,
    ) -> Self {
        let camera_options = &config.camera;
        let camera = CameraController::new(
            Vector3::from(camera_options.position),
            Vector3::from(camera_options.target),
            camera_options.zoom_speed,
            camera_options.pan_speed,
        );
        let projection = Projection::new(
            Rad(camera_options.fov_y),
            camera_options.aspect,
            camera_options.z_near,
            camera_options.z_far,
        );
        let pacer = Pacer::new(config.pacing.target_fps)
            .with_frame_limit(config.pacing.limit_frame_rate);

        Self {
            renderer,
            target,
            slot: DemoSlot::new(),
            factory,
            startup_demo: config.startup_demo,
            camera,
            projection,
            fixed_dt: camera_options.fixed_dt,
            playback: PlaybackState::default(),
            router: InputRouter::new(&config.keybindings),
            input: SharedInputBuffer::new(),
            pacer,
            stats: FrameStats::new(),
            runtime_errors: 0,
            started: false,
        }
    }

    /// Constructs the startup demo and the render context, then binds them.
    ///
    /// Any error here is fatal; the caller must not enter the frame loop.
    pub fn startup(&mut self) -> EngineResult<()> {
        if self.started {
            log::warn!("startup called twice; ignoring");
            return Ok(());
        }
        log::info!("starting with {}", self.startup_demo);

        self.load(self.startup_demo)?;
        self.started = true;
        Ok(())
    }

    /// Runs one iteration: input, camera, optional advance, render, pacing.
    ///
    /// Step failures are logged and counted; the session stays alive.
    pub fn tick(&mut self) {
        let deltas = self.input.drain();
        self.camera.apply_wheel(deltas.wheel, self.fixed_dt);
        self.camera
            .apply_drag(deltas.drag_dx, deltas.drag_dy, self.fixed_dt);

        if self.playback.should_advance() {
            let result = match self.slot.active_mut() {
                Some(demo) => demo.advance(),
                None => Ok(()),
            };
            self.playback.step_pending = false;
            if let Err(e) = result {
                self.report(e);
            }
        }

        let running = self.playback.is_running();
        if running {
            self.pacer.begin_phase(PHASE_RENDERER);
        }

        self.render();

        if running {
            self.pacer.end_phase(PHASE_RENDERER);
            // Budget covers the whole iteration, simulation included.
            let frame = self.pacer.frame_elapsed();
            self.stats.record(frame);
            let sleep = self.pacer.remaining(frame);
            self.pacer.suspend(sleep);
        }

        self.pacer.restart_frame_timer();
    }

    fn render(&mut self) {
        if !self.renderer.is_initialized() {
            log::debug!("skipping frame: renderer not initialized");
            return;
        }

        let pose = self.camera.pose();
        self.renderer.set_view_and_projection(
            pose.view_matrix(),
            self.projection.matrix(),
            to_shader_position(pose.position),
        );

        if let Err(e) = self.renderer.begin_frame() {
            self.report(e);
            return;
        }
        let drawn = match self.slot.active() {
            Some(demo) => demo.draw(&mut self.renderer),
            None => Ok(()),
        };
        if let Err(e) = drawn {
            self.report(e);
        }
        if let Err(e) = self.renderer.end_frame() {
            self.report(e);
        }
    }

    fn report(&mut self, error: EngineError) {
        self.runtime_errors += 1;
        if error.is_fatal() {
            log::error!("step failed: {error}");
        } else {
            log::warn!("{error}");
        }
    }

    /// Routes a key press.
    ///
    /// Bound keys run their action; anything else goes to the active demo.
    /// An error from a swap is fatal.
    pub fn handle_key(&mut self, key: KeyCode) -> EngineResult<Control> {
        match self.router.route(key) {
            Route::Action(action) => return self.run_action(action),
            Route::SelectDemo(kind) => self.swap_to(kind)?,
            Route::Forward => {
                if let Some(demo) = self.slot.active_mut() {
                    demo.handle_input(key);
                }
            }
        }
        Ok(Control::Continue)
    }

    /// Routes an auto-repeat of a held key.
    ///
    /// Holding the step key keeps stepping while paused, and held unbound
    /// keys keep reaching the demo. Other bound keys act once per press.
    pub fn handle_key_repeat(&mut self, key: KeyCode) {
        match self.router.route(key) {
            Route::Action(KeyAction::Step) => self.request_step(),
            Route::Forward => {
                if let Some(demo) = self.slot.active_mut() {
                    demo.handle_input(key);
                }
            }
            Route::Action(_) | Route::SelectDemo(_) => {}
        }
    }

    fn run_action(&mut self, action: KeyAction) -> EngineResult<Control> {
        match action {
            KeyAction::TogglePause => self.toggle_pause(),
            KeyAction::Step => self.request_step(),
            KeyAction::ResetCamera => self.reset_camera(),
            KeyAction::ToggleParticles => self.toggle_particles(),
            KeyAction::ReloadDemo => self.reload()?,
            KeyAction::Quit => return Ok(Control::Exit),
        }
        Ok(Control::Continue)
    }

    /// Replaces the active demo with a fresh `kind` instance.
    ///
    /// The old demo and the render context are both torn down before the
    /// new demo is constructed, and the render context is rebuilt against
    /// the same target before the new demo binds to it. Release failures are
    /// only logged; every later failure is returned as fatal.
    pub fn swap_to(&mut self, kind: DemoKind) -> EngineResult<()> {
        match self.slot.active_kind() {
            Some(current) => log::info!("switching {current} -> {kind}"),
            None => log::info!("loading {kind}"),
        }

        self.pacer.begin_phase(PHASE_RELEASE_DEMO);
        self.slot.release_active();
        self.pacer.end_phase(PHASE_RELEASE_DEMO);

        self.pacer.begin_phase(PHASE_RELEASE_RENDERING);
        self.renderer.release();
        self.pacer.end_phase(PHASE_RELEASE_RENDERING);

        self.load(kind)
    }

    /// Constructs and initializes `kind`, (re)initializes the render
    /// context, then binds the demo to it. The slot must be empty.
    fn load(&mut self, kind: DemoKind) -> EngineResult<()> {
        self.pacer.begin_phase(PHASE_INIT_DEMO);
        let mut demo = self.factory.create(kind);
        let result = demo.initialize();
        self.pacer.end_phase(PHASE_INIT_DEMO);
        if let Err(e) = result {
            release_quietly(demo.as_mut());
            return Err(escalate(e, "demo initialize"));
        }

        self.pacer.begin_phase(PHASE_INIT_RENDERING);
        let result = self.renderer.initialize(&self.target);
        self.pacer.end_phase(PHASE_INIT_RENDERING);
        if let Err(e) = result {
            release_quietly(demo.as_mut());
            return Err(escalate(e, "renderer initialize"));
        }

        self.pacer.begin_phase(PHASE_BIND_DEMO);
        let result = demo.bind_to_renderer(&mut self.renderer);
        self.pacer.end_phase(PHASE_BIND_DEMO);
        if let Err(e) = result {
            release_quietly(demo.as_mut());
            return Err(escalate(e, "demo bind"));
        }

        self.slot.install(demo);
        self.pacer.restart_frame_timer();
        Ok(())
    }

    /// Swaps the active demo for a fresh instance of the same kind.
    pub fn reload(&mut self) -> EngineResult<()> {
        let kind = self.slot.active_kind().unwrap_or(self.startup_demo);
        self.swap_to(kind)
    }

    pub fn toggle_pause(&mut self) {
        self.playback.paused = !self.playback.paused;
        if !self.playback.paused {
            self.playback.step_pending = false;
        }
        log::info!(
            "{}",
            if self.playback.paused { "paused" } else { "resumed" }
        );
    }

    /// Queues one advance for the next tick. Ignored while running.
    pub fn request_step(&mut self) {
        if self.playback.paused {
            self.playback.step_pending = true;
        } else {
            log::debug!("step ignored while running");
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn toggle_particles(&mut self) {
        let shown = !self.renderer.display_flag(DisplayFlag::Particles);
        self.renderer.set_display_flag(DisplayFlag::Particles, shown);
        log::info!("particles {}", if shown { "shown" } else { "hidden" });
    }

    /// Forwards a new surface size to the renderer.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.renderer.resize(width, height);
        }
    }

    /// Releases the demo and the render context. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(kind) = self.slot.release_active() {
            log::info!("released {kind}");
        }
        self.renderer.release();
        self.started = false;
    }

    pub fn input(&self) -> SharedInputBuffer {
        self.input.clone()
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_paused(&self) -> bool {
        self.playback.paused
    }

    pub fn active_kind(&self) -> Option<DemoKind> {
        self.slot.active_kind()
    }

    /// Step counter of the active demo (0 when none is loaded)
    pub fn step_count(&self) -> u64 {
        self.slot.active().map_or(0, |d| d.step_count())
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn frame_stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Non-fatal errors reported since startup
    pub fn runtime_error_count(&self) -> u64 {
        self.runtime_errors
    }
}

/// Release after a failed lifecycle step. The demo may be half-built.
fn release_quietly(demo: &mut dyn crate::simulation::Demo) {
    if let Err(e) = demo.release() {
        log::warn!("{} did not release cleanly: {e}", demo.name());
    }
}

/// Failures during startup or a swap cannot be survived, whatever their
/// class.
fn escalate(error: EngineError, stage: &str) -> EngineError {
    if error.is_fatal() {
        error
    } else {
        EngineError::Initialization(format!("{stage}: {error}"))
    }
}
