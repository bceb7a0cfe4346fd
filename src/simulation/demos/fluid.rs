//! Particle fluid in a box
//!
//! Smoothed-particle hydrodynamics with poly6 density, spiky pressure
//! gradient and laplacian viscosity. The rest density is sampled from the
//! initial block so the fluid starts at equilibrium.

use cgmath::{InnerSpace, Vector3, Zero};
use std::f32::consts::PI;
use winit::keyboard::KeyCode;

use crate::error::{EngineError, EngineResult};
use crate::gfx::rendering::{ParticleVertex, RenderContext};
use crate::simulation::{cpu::CpuDemoBase, kind::DemoKind, traits::Demo};

const BLOCK: (usize, usize, usize) = (16, 16, 2);
const SPACING: f32 = 0.5;
const SMOOTHING: f32 = 1.0;
const MASS: f32 = 1.0;
const STIFFNESS: f32 = 20.0;
const VISCOSITY: f32 = 0.5;
const GRAVITY: f32 = -9.8;
const SUBSTEPS: usize = 3;
const SUBSTEP_DT: f32 = 0.004;
const WALL_DAMPING: f32 = 0.3;
const BOUNDS_MIN: [f32; 3] = [-8.0, -6.0, -1.0];
const BOUNDS_MAX: [f32; 3] = [8.0, 10.0, 1.0];

pub struct Fluid {
    base: CpuDemoBase,
    positions: Vec<Vector3<f32>>,
    velocities: Vec<Vector3<f32>>,
    densities: Vec<f32>,
    pressures: Vec<f32>,
    rest_density: f32,
    gravity_enabled: bool,
}

impl Fluid {
    pub fn new() -> Self {
        Self {
            base: CpuDemoBase::new(DemoKind::Fluid),
            positions: Vec::new(),
            velocities: Vec::new(),
            densities: Vec::new(),
            pressures: Vec::new(),
            rest_density: 1.0,
            gravity_enabled: true,
        }
    }

    fn poly6(r2: f32) -> f32 {
        let h2 = SMOOTHING * SMOOTHING;
        if r2 >= h2 {
            return 0.0;
        }
        let coeff = 315.0 / (64.0 * PI * SMOOTHING.powi(9));
        coeff * (h2 - r2).powi(3)
    }

    fn compute_densities(&mut self) {
        let n = self.positions.len();
        for i in 0..n {
            let mut density = 0.0;
            for j in 0..n {
                let r2 = (self.positions[i] - self.positions[j]).magnitude2();
                density += MASS * Self::poly6(r2);
            }
            self.densities[i] = density;
            self.pressures[i] = (STIFFNESS * (density - self.rest_density)).max(0.0);
        }
    }

    fn substep(&mut self) {
        self.compute_densities();

        let n = self.positions.len();
        let spiky = -45.0 / (PI * SMOOTHING.powi(6));
        let laplacian = 45.0 / (PI * SMOOTHING.powi(6));
        let gravity = if self.gravity_enabled {
            Vector3::new(0.0, GRAVITY, 0.0)
        } else {
            Vector3::zero()
        };

        let mut accelerations = vec![gravity; n];
        for i in 0..n {
            let mut force = Vector3::zero();
            for j in 0..n {
                if i == j {
                    continue;
                }
                let offset = self.positions[i] - self.positions[j];
                let r = offset.magnitude();
                if r >= SMOOTHING || r <= f32::EPSILON {
                    continue;
                }
                let falloff = SMOOTHING - r;
                let pressure = (self.pressures[i] + self.pressures[j]) / (2.0 * self.densities[j]);
                force += -(offset / r) * MASS * pressure * spiky * falloff * falloff;
                force += (self.velocities[j] - self.velocities[i]) * VISCOSITY * MASS
                    / self.densities[j]
                    * laplacian
                    * falloff;
            }
            accelerations[i] += force / self.densities[i].max(f32::EPSILON);
        }

        for i in 0..n {
            self.velocities[i] += accelerations[i] * SUBSTEP_DT;
            self.positions[i] += self.velocities[i] * SUBSTEP_DT;
            self.enforce_bounds(i);
        }
    }

    fn enforce_bounds(&mut self, i: usize) {
        let p = &mut self.positions[i];
        let v = &mut self.velocities[i];
        for axis in 0..3 {
            if p[axis] < BOUNDS_MIN[axis] {
                p[axis] = BOUNDS_MIN[axis];
                v[axis] *= -WALL_DAMPING;
            } else if p[axis] > BOUNDS_MAX[axis] {
                p[axis] = BOUNDS_MAX[axis];
                v[axis] *= -WALL_DAMPING;
            }
        }
    }

    fn sync_particles(&mut self) {
        for ((particle, p), v) in self
            .base
            .particles
            .iter_mut()
            .zip(&self.positions)
            .zip(&self.velocities)
        {
            let speed = (v.magnitude() / 8.0).min(1.0);
            particle.position = (*p).into();
            particle.color = [0.1 + 0.9 * speed, 0.4 + 0.6 * speed, 1.0, 1.0];
        }
    }
}

impl Default for Fluid {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Fluid {
    fn kind(&self) -> DemoKind {
        DemoKind::Fluid
    }

    fn initialize(&mut self) -> EngineResult<()> {
        let (nx, ny, nz) = BLOCK;
        let origin = Vector3::new(BOUNDS_MIN[0] + 0.5, BOUNDS_MIN[1] + 0.5, -0.25);
        self.positions.clear();
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    self.positions.push(
                        origin + Vector3::new(x as f32, y as f32, z as f32) * SPACING,
                    );
                }
            }
        }
        let n = self.positions.len();
        self.velocities = vec![Vector3::zero(); n];
        self.densities = vec![0.0; n];
        self.pressures = vec![0.0; n];

        // Equilibrium density of the initial block
        self.rest_density = 1.0;
        self.compute_densities();
        let mean = self.densities.iter().sum::<f32>() / n as f32;
        if !mean.is_finite() || mean <= 0.0 {
            return Err(EngineError::Initialization(
                "fluid rest density is not positive".into(),
            ));
        }
        self.rest_density = mean;

        let particles = vec![ParticleVertex::new([0.0; 3], 0.2, [0.1, 0.4, 1.0, 1.0]); n];
        self.base.reset(particles);
        self.sync_particles();
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.bind(context)
    }

    fn advance(&mut self) -> EngineResult<()> {
        for _ in 0..SUBSTEPS {
            self.substep();
        }
        if self.positions.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(EngineError::RuntimeStep("fluid state diverged".into()));
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
        self.densities.clear();
        self.pressures.clear();
        self.base.release();
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        if key == KeyCode::KeyG {
            self.gravity_enabled = !self.gravity_enabled;
            log::info!("fluid gravity {}", if self.gravity_enabled { "on" } else { "off" });
        }
    }

    fn step_count(&self) -> u64 {
        self.base.step_count
    }
}
