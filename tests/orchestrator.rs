//! Integration tests for the frame loop and demo lifecycle.
//!
//! A recording renderer and a recording demo factory write every lifecycle
//! call into one shared event log, so ordering guarantees can be checked
//! without a GPU.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cgmath::Matrix4;
use particle_engine::config::ViewerConfig;
use particle_engine::error::{EngineError, EngineResult};
use particle_engine::gfx::rendering::{
    BatchHandle, DisplayFlag, DisplayFlags, ParticleVertex, RenderContext, Renderer,
};
use particle_engine::orchestrator::{Control, Orchestrator};
use particle_engine::simulation::{BuiltinDemos, Demo, DemoKind};
use winit::keyboard::KeyCode;

// ============================================================================
// Recording collaborators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    RendererInit,
    RendererRelease,
    BeginFrame,
    EndFrame,
    DemoCreate(u32, DemoKind),
    DemoInit(u32),
    DemoBind(u32),
    DemoAdvance(u32),
    DemoDraw(u32),
    DemoRelease(u32),
    DemoKey(u32, KeyCode),
    /// A contract was broken (frame on an uninitialized renderer, unpaired
    /// begin/end)
    Violation(&'static str),
}

type EventLog = Arc<Mutex<Vec<Event>>>;

fn push(log: &EventLog, event: Event) {
    log.lock().unwrap().push(event);
}

struct RecordingRenderer {
    log: EventLog,
    initialized: bool,
    in_frame: bool,
    init_calls: u32,
    /// 1-based initialize call that fails
    fail_init_call: Option<u32>,
    fail_begin_frame: bool,
    batches: u32,
    flags: DisplayFlags,
}

impl RecordingRenderer {
    fn new(log: EventLog) -> Self {
        Self {
            log,
            initialized: false,
            in_frame: false,
            init_calls: 0,
            fail_init_call: None,
            fail_begin_frame: false,
            batches: 0,
            flags: DisplayFlags::default(),
        }
    }
}

impl RenderContext for RecordingRenderer {
    fn create_batch(&mut self, _label: &str, _capacity: usize) -> EngineResult<BatchHandle> {
        if !self.initialized {
            push(&self.log, Event::Violation("batch on uninitialized renderer"));
        }
        self.batches += 1;
        Ok(BatchHandle::from_index(self.batches - 1))
    }

    fn update_batch(&mut self, _batch: BatchHandle, _particles: &[ParticleVertex]) -> EngineResult<()> {
        Ok(())
    }

    fn draw_batch(&mut self, _batch: BatchHandle) -> EngineResult<()> {
        if !self.in_frame {
            push(&self.log, Event::Violation("draw outside frame"));
        }
        Ok(())
    }

    fn set_display_flag(&mut self, flag: DisplayFlag, value: bool) {
        self.flags.set(flag, value);
    }

    fn display_flag(&self, flag: DisplayFlag) -> bool {
        self.flags.get(flag)
    }
}

impl Renderer for RecordingRenderer {
    type Target = ();

    fn initialize(&mut self, _target: &()) -> EngineResult<()> {
        self.init_calls += 1;
        push(&self.log, Event::RendererInit);
        if self.fail_init_call == Some(self.init_calls) {
            return Err(EngineError::DeviceInitialization("device lost".into()));
        }
        self.initialized = true;
        self.batches = 0;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn set_view_and_projection(&mut self, _v: Matrix4<f32>, _p: Matrix4<f32>, pos: [f32; 4]) {
        if pos[3] != 0.0 {
            push(&self.log, Event::Violation("camera w channel not zero"));
        }
    }

    fn begin_frame(&mut self) -> EngineResult<()> {
        push(&self.log, Event::BeginFrame);
        if self.fail_begin_frame {
            return Err(EngineError::RuntimeStep("surface lost".into()));
        }
        if !self.initialized {
            push(&self.log, Event::Violation("begin_frame while uninitialized"));
        }
        if self.in_frame {
            push(&self.log, Event::Violation("begin_frame twice"));
        }
        self.in_frame = true;
        Ok(())
    }

    fn end_frame(&mut self) -> EngineResult<()> {
        push(&self.log, Event::EndFrame);
        if !self.in_frame {
            push(&self.log, Event::Violation("end_frame without begin"));
        }
        self.in_frame = false;
        Ok(())
    }

    fn release(&mut self) {
        push(&self.log, Event::RendererRelease);
        self.initialized = false;
    }
}

/// Failure switches shared by every demo the factory builds
#[derive(Default)]
struct Faults {
    initialize: AtomicBool,
    bind: AtomicBool,
    advance: AtomicBool,
    draw: AtomicBool,
    release: AtomicBool,
    advance_delay_ms: AtomicU64,
}

fn tripped(flag: &AtomicBool) -> bool {
    flag.load(Ordering::SeqCst)
}

struct RecordingDemo {
    id: u32,
    kind: DemoKind,
    log: EventLog,
    steps: u64,
    faults: Arc<Faults>,
}

impl Demo for RecordingDemo {
    fn kind(&self) -> DemoKind {
        self.kind
    }

    fn initialize(&mut self) -> EngineResult<()> {
        push(&self.log, Event::DemoInit(self.id));
        self.steps = 0;
        if tripped(&self.faults.initialize) {
            return Err(EngineError::RuntimeStep("no particles".into()));
        }
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        push(&self.log, Event::DemoBind(self.id));
        if tripped(&self.faults.bind) {
            return Err(EngineError::RuntimeStep("batch rejected".into()));
        }
        context.create_batch("recording", 1).map(|_| ())
    }

    fn advance(&mut self) -> EngineResult<()> {
        push(&self.log, Event::DemoAdvance(self.id));
        self.steps += 1;
        let delay = self.faults.advance_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        if tripped(&self.faults.advance) {
            return Err(EngineError::RuntimeStep("diverged".into()));
        }
        Ok(())
    }

    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        push(&self.log, Event::DemoDraw(self.id));
        if tripped(&self.faults.draw) {
            return Err(EngineError::RuntimeStep("stale batch".into()));
        }
        context.draw_batch(BatchHandle::from_index(0))
    }

    fn release(&mut self) -> EngineResult<()> {
        push(&self.log, Event::DemoRelease(self.id));
        if tripped(&self.faults.release) {
            return Err(EngineError::RuntimeStep("buffer still mapped".into()));
        }
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        push(&self.log, Event::DemoKey(self.id, key));
    }

    fn step_count(&self) -> u64 {
        self.steps
    }
}

struct Harness {
    log: EventLog,
    faults: Arc<Faults>,
    orchestrator: Orchestrator<RecordingRenderer>,
}

fn test_config(startup_demo: DemoKind) -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.startup_demo = startup_demo;
    config.pacing.limit_frame_rate = false;
    config
}

fn harness_with(startup_demo: DemoKind, fail_init_call: Option<u32>) -> Harness {
    harness_from(&test_config(startup_demo), fail_init_call)
}

fn harness_from(config: &ViewerConfig, fail_init_call: Option<u32>) -> Harness {
    let log: EventLog = Arc::default();
    let faults = Arc::new(Faults::default());
    let next_id = Arc::new(AtomicU32::new(0));

    let factory_log = Arc::clone(&log);
    let factory_faults = Arc::clone(&faults);
    let factory = move |kind: DemoKind| -> Box<dyn Demo> {
        let id = next_id.fetch_add(1, Ordering::SeqCst);
        push(&factory_log, Event::DemoCreate(id, kind));
        Box::new(RecordingDemo {
            id,
            kind,
            log: Arc::clone(&factory_log),
            steps: 0,
            faults: Arc::clone(&factory_faults),
        })
    };

    let mut renderer = RecordingRenderer::new(Arc::clone(&log));
    renderer.fail_init_call = fail_init_call;

    let orchestrator = Orchestrator::new(renderer, (), Box::new(factory), config);
    Harness {
        log,
        faults,
        orchestrator,
    }
}

fn started(startup_demo: DemoKind) -> Harness {
    let mut harness = harness_with(startup_demo, None);
    harness.orchestrator.startup().unwrap();
    harness
}

impl Harness {
    fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    fn count(&self, wanted: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| wanted(e)).count()
    }

    fn assert_no_violations(&self) {
        let violations: Vec<_> = self
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::Violation(_)))
            .collect();
        assert!(violations.is_empty(), "contract violations: {violations:?}");
    }
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_startup_order() {
    let harness = started(DemoKind::TestGrid);
    assert_eq!(
        harness.events(),
        vec![
            Event::DemoCreate(0, DemoKind::TestGrid),
            Event::DemoInit(0),
            Event::RendererInit,
            Event::DemoBind(0),
        ]
    );
    assert_eq!(harness.orchestrator.active_kind(), Some(DemoKind::TestGrid));
}

#[test]
fn test_startup_renderer_failure_is_fatal() {
    let mut harness = harness_with(DemoKind::Fluid, Some(1));
    let err = harness.orchestrator.startup().unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, EngineError::DeviceInitialization(_)));
    assert_eq!(harness.orchestrator.active_kind(), None);
    // The half-built demo was still released
    assert_eq!(harness.count(|e| matches!(e, Event::DemoRelease(0))), 1);
}

// ============================================================================
// Running, pause and step
// ============================================================================

#[test]
fn test_sixty_ticks_on_test_grid() {
    let log: EventLog = Arc::default();
    let mut orchestrator = Orchestrator::new(
        RecordingRenderer::new(Arc::clone(&log)),
        (),
        Box::new(BuiltinDemos),
        &test_config(DemoKind::TestGrid),
    );
    orchestrator.startup().unwrap();

    for _ in 0..60 {
        orchestrator.tick();
    }

    assert_eq!(orchestrator.step_count(), 60);
    assert_eq!(orchestrator.runtime_error_count(), 0);
    let events = log.lock().unwrap().clone();
    assert_eq!(events.iter().filter(|e| **e == Event::BeginFrame).count(), 60);
    assert!(!events.iter().any(|e| matches!(e, Event::Violation(_))));
}

#[test]
fn test_tick_advances_before_drawing() {
    let mut harness = started(DemoKind::TestGrid);
    harness.clear();
    harness.orchestrator.tick();
    assert_eq!(
        harness.events(),
        vec![
            Event::DemoAdvance(0),
            Event::BeginFrame,
            Event::DemoDraw(0),
            Event::EndFrame,
        ]
    );
}

#[test]
fn test_paused_ticks_render_without_advancing() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.tick();
    harness.orchestrator.toggle_pause();
    assert!(harness.orchestrator.is_paused());

    harness.clear();
    for _ in 0..10 {
        harness.orchestrator.tick();
    }

    assert_eq!(harness.orchestrator.step_count(), 1);
    assert_eq!(harness.count(|e| matches!(e, Event::DemoAdvance(_))), 0);
    assert_eq!(harness.count(|e| matches!(e, Event::DemoDraw(_))), 10);
    harness.assert_no_violations();
}

#[test]
fn test_single_step_while_paused() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.toggle_pause();

    harness.orchestrator.request_step();
    harness.orchestrator.tick();
    assert_eq!(harness.orchestrator.step_count(), 1);

    harness.orchestrator.tick();
    harness.orchestrator.tick();
    assert_eq!(harness.orchestrator.step_count(), 1);
}

#[test]
fn test_step_requested_while_running_is_not_kept() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.request_step();
    harness.orchestrator.toggle_pause();
    harness.orchestrator.tick();
    assert_eq!(harness.orchestrator.step_count(), 0);
}

#[test]
fn test_step_pending_cleared_even_when_advance_fails() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.toggle_pause();
    harness.faults.advance.store(true, Ordering::SeqCst);

    harness.orchestrator.request_step();
    harness.orchestrator.tick();
    assert!(!harness.orchestrator.playback().step_pending);
    harness.orchestrator.tick();
    assert_eq!(harness.count(|e| matches!(e, Event::DemoAdvance(_))), 1);
}

#[test]
fn test_runtime_errors_do_not_stop_the_loop() {
    let mut harness = started(DemoKind::Fluid);
    harness.faults.advance.store(true, Ordering::SeqCst);
    for _ in 0..5 {
        harness.orchestrator.tick();
    }
    assert_eq!(harness.orchestrator.runtime_error_count(), 5);
    assert_eq!(harness.count(|e| matches!(e, Event::EndFrame)), 5);

    harness.faults.advance.store(false, Ordering::SeqCst);
    harness.orchestrator.tick();
    assert_eq!(harness.orchestrator.runtime_error_count(), 5);
    assert_eq!(harness.orchestrator.step_count(), 6);
}

#[test]
fn test_draw_failure_keeps_frames_paired() {
    let mut harness = started(DemoKind::TestGrid);
    harness.faults.draw.store(true, Ordering::SeqCst);
    harness.clear();
    for _ in 0..3 {
        harness.orchestrator.tick();
    }

    assert_eq!(harness.orchestrator.runtime_error_count(), 3);
    assert_eq!(harness.count(|e| *e == Event::BeginFrame), 3);
    assert_eq!(harness.count(|e| *e == Event::EndFrame), 3);
    assert_eq!(harness.orchestrator.step_count(), 3);
    harness.assert_no_violations();
}

#[test]
fn test_begin_frame_failure_skips_draw_and_end() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.renderer_mut().fail_begin_frame = true;
    harness.clear();
    harness.orchestrator.tick();

    assert_eq!(harness.orchestrator.runtime_error_count(), 1);
    assert_eq!(harness.orchestrator.step_count(), 1);
    assert_eq!(
        harness.events(),
        vec![Event::DemoAdvance(0), Event::BeginFrame]
    );

    harness.orchestrator.renderer_mut().fail_begin_frame = false;
    harness.clear();
    harness.orchestrator.tick();
    assert_eq!(
        harness.events(),
        vec![
            Event::DemoAdvance(0),
            Event::BeginFrame,
            Event::DemoDraw(0),
            Event::EndFrame,
        ]
    );
    harness.assert_no_violations();
}

// ============================================================================
// Swapping
// ============================================================================

#[test]
fn test_swap_releases_old_module_before_initializing_new() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.tick();
    harness.clear();

    harness.orchestrator.swap_to(DemoKind::GalaxyNBody).unwrap();

    assert_eq!(
        harness.events(),
        vec![
            Event::DemoRelease(0),
            Event::RendererRelease,
            Event::DemoCreate(1, DemoKind::GalaxyNBody),
            Event::DemoInit(1),
            Event::RendererInit,
            Event::DemoBind(1),
        ]
    );
    assert_eq!(harness.orchestrator.active_kind(), Some(DemoKind::GalaxyNBody));
}

#[test]
fn test_old_module_untouched_after_swap() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.swap_to(DemoKind::ClothSheet).unwrap();
    harness.clear();

    for _ in 0..5 {
        harness.orchestrator.tick();
    }
    harness.orchestrator.handle_key(KeyCode::KeyG).unwrap();

    let touches_old = harness.count(|e| {
        matches!(
            e,
            Event::DemoAdvance(0)
                | Event::DemoDraw(0)
                | Event::DemoBind(0)
                | Event::DemoKey(0, _)
                | Event::DemoRelease(0)
        )
    });
    assert_eq!(touches_old, 0);
    assert_eq!(harness.orchestrator.step_count(), 5);
    harness.assert_no_violations();
}

#[test]
fn test_swap_initializes_renderer_exactly_once() {
    let mut harness = started(DemoKind::TestGrid);
    let before = harness.count(|e| *e == Event::RendererInit);
    harness.orchestrator.swap_to(DemoKind::GalaxyNBody).unwrap();
    let after = harness.count(|e| *e == Event::RendererInit);
    assert_eq!(after, before + 1);
}

#[test]
fn test_renderer_failure_during_swap_is_fatal() {
    let mut harness = harness_with(DemoKind::TestGrid, Some(2));
    harness.orchestrator.startup().unwrap();

    let err = harness
        .orchestrator
        .swap_to(DemoKind::RainParticles)
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(!harness.orchestrator.renderer().is_initialized());
    assert_eq!(harness.orchestrator.active_kind(), None);

    // A stray tick after the failure never touches the dead renderer
    harness.clear();
    harness.orchestrator.tick();
    assert_eq!(harness.count(|e| *e == Event::BeginFrame), 0);
    harness.assert_no_violations();
}

#[test]
fn test_release_failure_during_swap_is_logged_and_swap_continues() {
    let mut harness = started(DemoKind::TestGrid);
    harness.faults.release.store(true, Ordering::SeqCst);
    harness.clear();

    harness.orchestrator.swap_to(DemoKind::GalaxyNBody).unwrap();

    assert_eq!(
        harness.events(),
        vec![
            Event::DemoRelease(0),
            Event::RendererRelease,
            Event::DemoCreate(1, DemoKind::GalaxyNBody),
            Event::DemoInit(1),
            Event::RendererInit,
            Event::DemoBind(1),
        ]
    );
    assert_eq!(harness.orchestrator.active_kind(), Some(DemoKind::GalaxyNBody));
    assert_eq!(harness.orchestrator.runtime_error_count(), 0);
}

#[test]
fn test_demo_initialize_failure_during_swap_is_fatal() {
    let mut harness = started(DemoKind::TestGrid);
    harness.faults.initialize.store(true, Ordering::SeqCst);
    harness.clear();

    let err = harness.orchestrator.swap_to(DemoKind::Fluid).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, EngineError::Initialization(_)));
    assert_eq!(
        harness.events(),
        vec![
            Event::DemoRelease(0),
            Event::RendererRelease,
            Event::DemoCreate(1, DemoKind::Fluid),
            Event::DemoInit(1),
            Event::DemoRelease(1),
        ]
    );
    assert_eq!(harness.orchestrator.active_kind(), None);
    assert!(!harness.orchestrator.renderer().is_initialized());
}

#[test]
fn test_demo_bind_failure_during_swap_is_fatal() {
    let mut harness = started(DemoKind::TestGrid);
    harness.faults.bind.store(true, Ordering::SeqCst);
    harness.clear();

    let err = harness.orchestrator.swap_to(DemoKind::ClothSheet).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("demo bind"));
    assert_eq!(
        harness.events(),
        vec![
            Event::DemoRelease(0),
            Event::RendererRelease,
            Event::DemoCreate(1, DemoKind::ClothSheet),
            Event::DemoInit(1),
            Event::RendererInit,
            Event::DemoBind(1),
            Event::DemoRelease(1),
        ]
    );
    assert_eq!(harness.orchestrator.active_kind(), None);

    harness.clear();
    harness.orchestrator.tick();
    assert_eq!(harness.count(|e| matches!(e, Event::DemoDraw(_))), 0);
    harness.assert_no_violations();
}

// ============================================================================
// Input routing
// ============================================================================

#[test]
fn test_demo_select_key_swaps() {
    let mut harness = started(DemoKind::Fluid);
    let control = harness.orchestrator.handle_key(KeyCode::Digit4).unwrap();
    assert_eq!(control, Control::Continue);
    assert_eq!(harness.orchestrator.active_kind(), Some(DemoKind::GalaxyNBody));

    harness.orchestrator.handle_key(KeyCode::Numpad2).unwrap();
    assert_eq!(harness.orchestrator.active_kind(), Some(DemoKind::TestGrid));
}

#[test]
fn test_unmapped_key_forwarded_to_demo() {
    let mut harness = started(DemoKind::Fluid);
    harness.orchestrator.handle_key(KeyCode::KeyG).unwrap();
    assert_eq!(harness.count(|e| *e == Event::DemoKey(0, KeyCode::KeyG)), 1);
}

#[test]
fn test_bound_keys_not_forwarded() {
    let mut harness = started(DemoKind::Fluid);
    harness.orchestrator.handle_key(KeyCode::KeyP).unwrap();
    assert!(harness.orchestrator.is_paused());
    harness.orchestrator.handle_key(KeyCode::KeyS).unwrap();
    harness.orchestrator.tick();
    assert_eq!(harness.orchestrator.step_count(), 1);

    assert_eq!(harness.count(|e| matches!(e, Event::DemoKey(..))), 0);
}

#[test]
fn test_escape_requests_exit() {
    let mut harness = started(DemoKind::Fluid);
    assert_eq!(
        harness.orchestrator.handle_key(KeyCode::Escape).unwrap(),
        Control::Exit
    );
}

#[test]
fn test_toggle_particles_key() {
    let mut harness = started(DemoKind::Fluid);
    harness.orchestrator.handle_key(KeyCode::KeyT).unwrap();
    assert!(!harness
        .orchestrator
        .renderer()
        .display_flag(DisplayFlag::Particles));
    harness.orchestrator.handle_key(KeyCode::KeyT).unwrap();
    assert!(harness
        .orchestrator
        .renderer()
        .display_flag(DisplayFlag::Particles));
}

#[test]
fn test_reload_key_builds_fresh_instance_of_same_kind() {
    let mut harness = started(DemoKind::ClothSheet);
    harness.orchestrator.tick();
    harness.orchestrator.handle_key(KeyCode::KeyR).unwrap();

    assert_eq!(harness.orchestrator.active_kind(), Some(DemoKind::ClothSheet));
    assert_eq!(harness.orchestrator.step_count(), 0);
    assert_eq!(
        harness.count(|e| *e == Event::DemoCreate(1, DemoKind::ClothSheet)),
        1
    );
}

#[test]
fn test_held_step_key_keeps_stepping_while_paused() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.handle_key(KeyCode::KeyP).unwrap();
    harness.orchestrator.handle_key(KeyCode::KeyS).unwrap();
    harness.orchestrator.tick();
    for _ in 0..3 {
        harness.orchestrator.handle_key_repeat(KeyCode::KeyS);
        harness.orchestrator.tick();
    }
    assert_eq!(harness.orchestrator.step_count(), 4);
}

#[test]
fn test_repeats_of_other_bound_keys_are_ignored() {
    let mut harness = started(DemoKind::TestGrid);
    harness.orchestrator.handle_key(KeyCode::KeyP).unwrap();
    harness.orchestrator.handle_key_repeat(KeyCode::KeyP);
    harness.orchestrator.handle_key_repeat(KeyCode::Digit4);
    harness.orchestrator.handle_key_repeat(KeyCode::KeyT);

    assert!(harness.orchestrator.is_paused());
    assert_eq!(harness.orchestrator.active_kind(), Some(DemoKind::TestGrid));
    assert!(harness
        .orchestrator
        .renderer()
        .display_flag(DisplayFlag::Particles));

    harness.orchestrator.handle_key_repeat(KeyCode::KeyG);
    assert_eq!(harness.count(|e| *e == Event::DemoKey(0, KeyCode::KeyG)), 1);
}

// ============================================================================
// Camera input
// ============================================================================

#[test]
fn test_wheel_zooms_camera_once() {
    let mut harness = started(DemoKind::TestGrid);
    let start = harness.orchestrator.camera().pose().distance();

    harness.orchestrator.input().record(|b| b.add_wheel(1.0));
    harness.orchestrator.tick();
    let zoomed = harness.orchestrator.camera().pose().distance();
    assert!(zoomed < start);

    harness.orchestrator.tick();
    let after = harness.orchestrator.camera().pose().distance();
    assert!((after - zoomed).abs() < 1e-6);
}

#[test]
fn test_drag_pans_and_reset_restores() {
    let mut harness = started(DemoKind::TestGrid);
    let input = harness.orchestrator.input();
    input.record(|b| {
        b.set_pointer(100.0, 100.0);
        b.set_drag_held(true);
        b.set_pointer(60.0, 100.0);
    });
    harness.orchestrator.tick();
    assert!(harness.orchestrator.camera().pose().target.x > 0.0);

    harness.orchestrator.handle_key(KeyCode::KeyC).unwrap();
    let pose = harness.orchestrator.camera().pose();
    assert_eq!(pose.target.x, 0.0);
    assert_eq!(pose.position.z, 30.0);
}

#[test]
fn test_shutdown_releases_everything() {
    let mut harness = started(DemoKind::TestGrid);
    harness.clear();
    harness.orchestrator.shutdown();
    assert_eq!(
        harness.events(),
        vec![Event::DemoRelease(0), Event::RendererRelease]
    );
    assert_eq!(harness.orchestrator.active_kind(), None);
}

// ============================================================================
// Frame pacing
// ============================================================================

fn paced_config() -> ViewerConfig {
    let mut config = test_config(DemoKind::TestGrid);
    config.pacing.limit_frame_rate = true;
    config.pacing.target_fps = 60;
    config
}

fn average_tick(harness: &mut Harness, ticks: u32) -> Duration {
    let start = Instant::now();
    for _ in 0..ticks {
        harness.orchestrator.tick();
    }
    start.elapsed() / ticks
}

#[test]
fn test_pacing_budget_includes_simulation_cost() {
    let mut harness = harness_from(&paced_config(), None);
    harness.orchestrator.startup().unwrap();
    harness.faults.advance_delay_ms.store(12, Ordering::SeqCst);

    let per_tick = average_tick(&mut harness, 20);
    // 60 fps budget is ~16.7ms; a 12ms advance must not be added on top
    assert!(per_tick >= Duration::from_millis(15), "{per_tick:?}");
    assert!(per_tick < Duration::from_millis(20), "{per_tick:?}");
}

#[test]
fn test_pacing_fills_the_budget_for_cheap_frames() {
    let mut harness = harness_from(&paced_config(), None);
    harness.orchestrator.startup().unwrap();

    let per_tick = average_tick(&mut harness, 10);
    assert!(per_tick >= Duration::from_millis(15), "{per_tick:?}");
    assert_eq!(harness.orchestrator.frame_stats().sample_count(), 10);
}

#[test]
fn test_paused_ticks_do_not_sleep() {
    let mut harness = harness_from(&paced_config(), None);
    harness.orchestrator.startup().unwrap();
    harness.orchestrator.toggle_pause();

    let per_tick = average_tick(&mut harness, 10);
    assert!(per_tick < Duration::from_millis(10), "{per_tick:?}");
}
