//! Keyframed particle animation
//!
//! Particles move through a loop of shapes; each keyframe is held as the
//! start of a smoothstep blend toward the next one.

use cgmath::{Vector3, VectorSpace};
use winit::keyboard::KeyCode;

use super::layout;
use crate::error::EngineResult;
use crate::gfx::rendering::{ParticleVertex, RenderContext};
use crate::simulation::{cpu::CpuDemoBase, kind::DemoKind, traits::Demo};

const PARTICLE_COUNT: usize = 256;
const DT: f32 = 1.0 / 60.0;
const KEY_DURATION: f32 = 1.5;

pub struct AnimationPlayback {
    base: CpuDemoBase,
    keyframes: Vec<Vec<Vector3<f32>>>,
    time: f32,
    direction: f32,
}

impl AnimationPlayback {
    pub fn new() -> Self {
        Self {
            base: CpuDemoBase::new(DemoKind::AnimationPlayback),
            keyframes: Vec::new(),
            time: 0.0,
            direction: 1.0,
        }
    }

    fn loop_duration(&self) -> f32 {
        self.keyframes.len() as f32 * KEY_DURATION
    }

    /// Positions at the current playback time.
    fn sample(&self) -> Vec<Vector3<f32>> {
        let count = self.keyframes.len();
        if count == 0 {
            return Vec::new();
        }
        let cursor = self.time / KEY_DURATION;
        let from = (cursor.floor() as usize) % count;
        let to = (from + 1) % count;
        let t = layout::smoothstep(cursor.fract());

        self.keyframes[from]
            .iter()
            .zip(&self.keyframes[to])
            .map(|(a, b)| a.lerp(*b, t))
            .collect()
    }

    fn sync_particles(&mut self) {
        let positions = self.sample();
        let hue = self.time / self.loop_duration().max(f32::EPSILON);
        for (particle, p) in self.base.particles.iter_mut().zip(positions) {
            particle.position = p.into();
            particle.color = [0.5 + 0.5 * hue, 0.3, 1.0 - 0.5 * hue, 1.0];
        }
    }
}

impl Default for AnimationPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for AnimationPlayback {
    fn kind(&self) -> DemoKind {
        DemoKind::AnimationPlayback
    }

    fn initialize(&mut self) -> EngineResult<()> {
        self.keyframes = vec![
            layout::circle(PARTICLE_COUNT, 8.0),
            layout::grid(16, 16, 0.8),
            layout::sphere(PARTICLE_COUNT, 7.0),
            layout::line(PARTICLE_COUNT, 20.0),
        ];
        self.time = 0.0;
        self.direction = 1.0;

        self.base
            .reset(vec![ParticleVertex::new([0.0; 3], 0.15, [1.0; 4]); PARTICLE_COUNT]);
        self.sync_particles();
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.bind(context)
    }

    fn advance(&mut self) -> EngineResult<()> {
        let duration = self.loop_duration();
        self.time = (self.time + DT * self.direction).rem_euclid(duration);
        self.sync_particles();
        self.base.record_step();
        Ok(())
    }

    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.draw(context)
    }

    fn release(&mut self) -> EngineResult<()> {
        self.keyframes.clear();
        self.base.release();
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        if key == KeyCode::Space {
            self.direction = -self.direction;
        }
    }

    fn step_count(&self) -> u64 {
        self.base.step_count
    }
}
