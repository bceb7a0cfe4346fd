//! Blend between two particle layouts
//!
//! The blend factor ping-pongs between a flat grid and a sphere, easing in
//! and out at both ends.

use cgmath::{Vector3, VectorSpace};
use winit::keyboard::KeyCode;

use super::layout;
use crate::error::EngineResult;
use crate::gfx::rendering::{ParticleVertex, RenderContext};
use crate::simulation::{cpu::CpuDemoBase, kind::DemoKind, traits::Demo};

const SIDE: usize = 24;
const DT: f32 = 1.0 / 60.0;
const BLEND_SPEED: f32 = 0.25;
const FROM_COLOR: [f32; 4] = [0.2, 0.9, 0.4, 1.0];
const TO_COLOR: [f32; 4] = [1.0, 0.55, 0.1, 1.0];

pub struct TransitionBlend {
    base: CpuDemoBase,
    from: Vec<Vector3<f32>>,
    to: Vec<Vector3<f32>>,
    progress: f32,
    direction: f32,
    holding: bool,
}

impl TransitionBlend {
    pub fn new() -> Self {
        Self {
            base: CpuDemoBase::new(DemoKind::TransitionBlend),
            from: Vec::new(),
            to: Vec::new(),
            progress: 0.0,
            direction: 1.0,
            holding: false,
        }
    }

    pub fn blend_factor(&self) -> f32 {
        layout::smoothstep(self.progress)
    }

    fn sync_particles(&mut self) {
        let t = self.blend_factor();
        let mut color = [0.0; 4];
        for (c, (a, b)) in color.iter_mut().zip(FROM_COLOR.iter().zip(&TO_COLOR)) {
            *c = a + (b - a) * t;
        }
        for ((particle, a), b) in self.base.particles.iter_mut().zip(&self.from).zip(&self.to) {
            particle.position = a.lerp(*b, t).into();
            particle.color = color;
        }
    }
}

impl Default for TransitionBlend {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for TransitionBlend {
    fn kind(&self) -> DemoKind {
        DemoKind::TransitionBlend
    }

    fn initialize(&mut self) -> EngineResult<()> {
        let count = SIDE * SIDE;
        self.from = layout::grid(SIDE, SIDE, 0.6);
        self.to = layout::sphere(count, 6.0);
        self.progress = 0.0;
        self.direction = 1.0;
        self.holding = false;

        self.base
            .reset(vec![ParticleVertex::new([0.0; 3], 0.12, FROM_COLOR); count]);
        self.sync_particles();
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.bind(context)
    }

    fn advance(&mut self) -> EngineResult<()> {
        if !self.holding {
            self.progress += BLEND_SPEED * DT * self.direction;
            if self.progress >= 1.0 {
                self.progress = 1.0;
                self.direction = -1.0;
            } else if self.progress <= 0.0 {
                self.progress = 0.0;
                self.direction = 1.0;
            }
        }
        self.sync_particles();
        self.base.record_step();
        Ok(())
    }

    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.draw(context)
    }

    fn release(&mut self) -> EngineResult<()> {
        self.from.clear();
        self.to.clear();
        self.base.release();
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        if key == KeyCode::Space {
            self.holding = !self.holding;
        }
    }

    fn step_count(&self) -> u64 {
        self.base.step_count
    }
}
