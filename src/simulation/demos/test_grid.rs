//! Static particle grid
//!
//! Nothing moves; each step only advances the step counter and pulses the
//! grid color, which makes it a cheap scenario for checking the frame loop.

use winit::keyboard::KeyCode;

use super::layout;
use crate::error::EngineResult;
use crate::gfx::rendering::{ParticleVertex, RenderContext};
use crate::simulation::{cpu::CpuDemoBase, kind::DemoKind, traits::Demo};

const COLUMNS: usize = 20;
const ROWS: usize = 20;
const SPACING: f32 = 1.0;
const PULSE_PERIOD: u64 = 120;

pub struct TestGrid {
    base: CpuDemoBase,
    pulsing: bool,
}

impl TestGrid {
    pub fn new() -> Self {
        Self {
            base: CpuDemoBase::new(DemoKind::TestGrid),
            pulsing: true,
        }
    }

    fn color_at(step: u64, index: usize) -> [f32; 4] {
        let phase = ((step + index as u64) % PULSE_PERIOD) as f32 / PULSE_PERIOD as f32;
        let glow = 0.6 + 0.4 * (phase * std::f32::consts::TAU).sin();
        [0.2 * glow, 0.8 * glow, 0.3 + 0.5 * glow, 1.0]
    }
}

impl Default for TestGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for TestGrid {
    fn kind(&self) -> DemoKind {
        DemoKind::TestGrid
    }

    fn initialize(&mut self) -> EngineResult<()> {
        let particles = layout::grid(COLUMNS, ROWS, SPACING)
            .into_iter()
            .enumerate()
            .map(|(i, p)| ParticleVertex::new(p.into(), 0.15, Self::color_at(0, i)))
            .collect();
        self.base.reset(particles);
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.bind(context)
    }

    fn advance(&mut self) -> EngineResult<()> {
        self.base.record_step();
        if self.pulsing {
            let step = self.base.step_count;
            for (i, particle) in self.base.particles.iter_mut().enumerate() {
                particle.color = Self::color_at(step, i);
            }
        }
        Ok(())
    }

    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.draw(context)
    }

    fn release(&mut self) -> EngineResult<()> {
        self.base.release();
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        if key == KeyCode::Space {
            self.pulsing = !self.pulsing;
        }
    }

    fn step_count(&self) -> u64 {
        self.base.step_count
    }
}
