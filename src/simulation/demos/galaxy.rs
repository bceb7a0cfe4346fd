//! Disc galaxy
//!
//! Stars orbit a heavy core under softened pairwise gravity, integrated
//! with kick-drift-kick leapfrog. Initial velocities are circular orbits
//! around the enclosed core mass.

use cgmath::{InnerSpace, Vector3, Zero};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::TAU;
use winit::keyboard::KeyCode;

use crate::error::{EngineError, EngineResult};
use crate::gfx::rendering::{ParticleVertex, RenderContext};
use crate::simulation::{cpu::CpuDemoBase, kind::DemoKind, traits::Demo};

const STAR_COUNT: usize = 400;
const SEED: u64 = 0x6a1a_c71c;
const G: f32 = 1.0;
const CORE_MASS: f32 = 2000.0;
const STAR_MASS: f32 = 0.05;
const SOFTENING: f32 = 0.5;
const DT: f32 = 0.002;
const DISC_RADIUS: (f32, f32) = (2.0, 14.0);

pub struct GalaxyNBody {
    base: CpuDemoBase,
    positions: Vec<Vector3<f32>>,
    velocities: Vec<Vector3<f32>>,
    accelerations: Vec<Vector3<f32>>,
    time_scale: f32,
}

impl GalaxyNBody {
    pub fn new() -> Self {
        Self {
            base: CpuDemoBase::new(DemoKind::GalaxyNBody),
            positions: Vec::new(),
            velocities: Vec::new(),
            accelerations: Vec::new(),
            time_scale: 1.0,
        }
    }

    fn compute_accelerations(&mut self) {
        let n = self.positions.len();
        let eps2 = SOFTENING * SOFTENING;
        for i in 0..n {
            // Core sits fixed at the origin
            let to_core = -self.positions[i];
            let d2 = to_core.magnitude2() + eps2;
            let mut acc = to_core * (G * CORE_MASS / (d2 * d2.sqrt()));

            for j in 0..n {
                if i == j {
                    continue;
                }
                let offset = self.positions[j] - self.positions[i];
                let d2 = offset.magnitude2() + eps2;
                acc += offset * (G * STAR_MASS / (d2 * d2.sqrt()));
            }
            self.accelerations[i] = acc;
        }
    }

    fn sync_particles(&mut self) {
        for (particle, (p, v)) in self
            .base
            .particles
            .iter_mut()
            .zip(self.positions.iter().zip(&self.velocities))
        {
            let heat = (v.magnitude() / 25.0).min(1.0);
            particle.position = (*p).into();
            particle.color = [1.0, 0.6 + 0.4 * heat, 0.3 + 0.7 * heat, 1.0];
        }
    }

    fn total_energy(&self) -> f32 {
        let eps2 = SOFTENING * SOFTENING;
        let mut energy = 0.0;
        for (i, (p, v)) in self.positions.iter().zip(&self.velocities).enumerate() {
            energy += 0.5 * STAR_MASS * v.magnitude2();
            energy -= G * CORE_MASS * STAR_MASS / (p.magnitude2() + eps2).sqrt();
            for q in &self.positions[i + 1..] {
                energy -= G * STAR_MASS * STAR_MASS / ((p - q).magnitude2() + eps2).sqrt();
            }
        }
        energy
    }
}

impl Default for GalaxyNBody {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for GalaxyNBody {
    fn kind(&self) -> DemoKind {
        DemoKind::GalaxyNBody
    }

    fn initialize(&mut self) -> EngineResult<()> {
        let mut rng = StdRng::seed_from_u64(SEED);
        self.positions.clear();
        self.velocities.clear();

        for _ in 0..STAR_COUNT {
            let radius = rng.random_range(DISC_RADIUS.0..DISC_RADIUS.1);
            let angle = rng.random_range(0.0..TAU);
            let height = rng.random_range(-0.3_f32..0.3);
            let position = Vector3::new(angle.cos() * radius, height, angle.sin() * radius);

            let enclosed = CORE_MASS + STAR_MASS * STAR_COUNT as f32 * (radius / DISC_RADIUS.1);
            let speed = (G * enclosed / (radius * radius + SOFTENING * SOFTENING).sqrt()).sqrt();
            let tangent = Vector3::new(-angle.sin(), 0.0, angle.cos());

            self.positions.push(position);
            self.velocities.push(tangent * speed);
        }
        self.accelerations = vec![Vector3::zero(); STAR_COUNT];
        self.compute_accelerations();

        let particles = vec![ParticleVertex::new([0.0; 3], 0.1, [1.0; 4]); STAR_COUNT];
        self.base.reset(particles);
        self.sync_particles();
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.bind(context)
    }

    fn advance(&mut self) -> EngineResult<()> {
        let dt = DT * self.time_scale;
        for (v, a) in self.velocities.iter_mut().zip(&self.accelerations) {
            *v += a * (0.5 * dt);
        }
        for (p, v) in self.positions.iter_mut().zip(&self.velocities) {
            *p += v * dt;
        }
        self.compute_accelerations();
        for (v, a) in self.velocities.iter_mut().zip(&self.accelerations) {
            *v += a * (0.5 * dt);
        }

        if self.positions.iter().any(|p| !p.magnitude2().is_finite()) {
            return Err(EngineError::RuntimeStep("galaxy state diverged".into()));
        }
        self.sync_particles();
        self.base.record_step();
        Ok(())
    }

    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.draw(context)
    }

    fn release(&mut self) -> EngineResult<()> {
        self.positions.clear();
        self.velocities.clear();
        self.accelerations.clear();
        self.base.release();
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Equal | KeyCode::NumpadAdd => self.time_scale = (self.time_scale * 2.0).min(8.0),
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                self.time_scale = (self.time_scale * 0.5).max(0.125)
            }
            _ => {}
        }
    }

    fn step_count(&self) -> u64 {
        self.base.step_count
    }
}
