//! Falling rain
//!
//! Drops fall from a ceiling, accelerate under gravity, and respawn at a
//! fresh random spot on the ceiling once they reach the floor.

use cgmath::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use winit::keyboard::KeyCode;

use crate::error::EngineResult;
use crate::gfx::rendering::{ParticleVertex, RenderContext};
use crate::simulation::{cpu::CpuDemoBase, kind::DemoKind, traits::Demo};

const DROP_COUNT: usize = 1000;
const SEED: u64 = 0x5241_494e;
const DT: f32 = 1.0 / 60.0;
const GRAVITY: f32 = -9.8;
const CEILING: f32 = 12.0;
const FLOOR: f32 = -12.0;
const HALF_WIDTH: f32 = 12.0;
const TERMINAL_SPEED: f32 = 20.0;

pub struct RainParticles {
    base: CpuDemoBase,
    positions: Vec<Vector3<f32>>,
    velocities: Vec<f32>,
    rng: StdRng,
    gravity_enabled: bool,
    respawns: u64,
}

impl RainParticles {
    pub fn new() -> Self {
        Self {
            base: CpuDemoBase::new(DemoKind::RainParticles),
            positions: Vec::new(),
            velocities: Vec::new(),
            rng: StdRng::seed_from_u64(SEED),
            gravity_enabled: true,
            respawns: 0,
        }
    }

    fn spawn(rng: &mut StdRng, height: f32) -> (Vector3<f32>, f32) {
        let position = Vector3::new(
            rng.random_range(-HALF_WIDTH..HALF_WIDTH),
            height,
            rng.random_range(-HALF_WIDTH..HALF_WIDTH),
        );
        let velocity = -rng.random_range(2.0_f32..6.0);
        (position, velocity)
    }

    pub fn respawn_count(&self) -> u64 {
        self.respawns
    }
}

impl Default for RainParticles {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for RainParticles {
    fn kind(&self) -> DemoKind {
        DemoKind::RainParticles
    }

    fn initialize(&mut self) -> EngineResult<()> {
        self.rng = StdRng::seed_from_u64(SEED);
        self.positions.clear();
        self.velocities.clear();
        self.respawns = 0;

        for _ in 0..DROP_COUNT {
            // Start spread over the whole column so the first frames are not empty
            let height = self.rng.random_range(FLOOR..CEILING);
            let (position, velocity) = Self::spawn(&mut self.rng, height);
            self.positions.push(position);
            self.velocities.push(velocity);
        }

        let particles = self
            .positions
            .iter()
            .map(|p| ParticleVertex::new((*p).into(), 0.06, [0.55, 0.7, 1.0, 0.8]))
            .collect();
        self.base.reset(particles);
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.bind(context)
    }

    fn advance(&mut self) -> EngineResult<()> {
        for i in 0..self.positions.len() {
            if self.gravity_enabled {
                self.velocities[i] = (self.velocities[i] + GRAVITY * DT).max(-TERMINAL_SPEED);
            }
            self.positions[i].y += self.velocities[i] * DT;

            if self.positions[i].y < FLOOR {
                let (position, velocity) = Self::spawn(&mut self.rng, CEILING);
                self.positions[i] = position;
                self.velocities[i] = velocity;
                self.respawns += 1;
            }
            self.base.particles[i].position = self.positions[i].into();
        }
        self.base.record_step();
        Ok(())
    }

    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.draw(context)
    }

    fn release(&mut self) -> EngineResult<()> {
        self.positions.clear();
        self.velocities.clear();
        self.base.release();
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        if key == KeyCode::KeyG {
            self.gravity_enabled = !self.gravity_enabled;
        }
    }

    fn step_count(&self) -> u64 {
        self.base.step_count
    }
}
