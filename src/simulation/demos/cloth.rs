//! Cloth sheet hanging from its top edge
//!
//! Position-based Verlet integration over a grid of point masses, with
//! structural and shear distance constraints relaxed a few times per step.

use cgmath::{InnerSpace, Vector3};
use winit::keyboard::KeyCode;

use super::layout;
use crate::error::EngineResult;
use crate::gfx::rendering::{ParticleVertex, RenderContext};
use crate::simulation::{cpu::CpuDemoBase, kind::DemoKind, traits::Demo};

const COLUMNS: usize = 24;
const ROWS: usize = 24;
const SPACING: f32 = 0.5;
const DT: f32 = 1.0 / 60.0;
const GRAVITY: f32 = -9.8;
const DAMPING: f32 = 0.99;
const RELAXATION_PASSES: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Link {
    a: usize,
    b: usize,
    rest: f32,
}

pub struct ClothSheet {
    base: CpuDemoBase,
    positions: Vec<Vector3<f32>>,
    previous: Vec<Vector3<f32>>,
    pinned: Vec<bool>,
    links: Vec<Link>,
    wind: f32,
}

impl ClothSheet {
    pub fn new() -> Self {
        Self {
            base: CpuDemoBase::new(DemoKind::ClothSheet),
            positions: Vec::new(),
            previous: Vec::new(),
            pinned: Vec::new(),
            links: Vec::new(),
            wind: 0.0,
        }
    }

    fn index(col: usize, row: usize) -> usize {
        row * COLUMNS + col
    }

    fn build_links(positions: &[Vector3<f32>]) -> Vec<Link> {
        let mut links = Vec::new();
        let mut connect = |a: usize, b: usize| {
            links.push(Link {
                a,
                b,
                rest: (positions[a] - positions[b]).magnitude(),
            });
        };
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                let here = Self::index(col, row);
                if col + 1 < COLUMNS {
                    connect(here, Self::index(col + 1, row));
                }
                if row + 1 < ROWS {
                    connect(here, Self::index(col, row + 1));
                }
                if col + 1 < COLUMNS && row + 1 < ROWS {
                    connect(here, Self::index(col + 1, row + 1));
                    connect(Self::index(col + 1, row), Self::index(col, row + 1));
                }
            }
        }
        links
    }

    fn integrate(&mut self) {
        let acceleration = Vector3::new(0.0, GRAVITY, self.wind);
        for i in 0..self.positions.len() {
            if self.pinned[i] {
                continue;
            }
            let current = self.positions[i];
            let velocity = (current - self.previous[i]) * DAMPING;
            self.previous[i] = current;
            self.positions[i] = current + velocity + acceleration * DT * DT;
        }
    }

    fn relax(&mut self) {
        for _ in 0..RELAXATION_PASSES {
            for link in &self.links {
                let delta = self.positions[link.b] - self.positions[link.a];
                let length = delta.magnitude();
                if length <= f32::EPSILON {
                    continue;
                }
                let correction = delta * ((length - link.rest) / length);
                match (self.pinned[link.a], self.pinned[link.b]) {
                    (true, true) => {}
                    (true, false) => self.positions[link.b] -= correction,
                    (false, true) => self.positions[link.a] += correction,
                    (false, false) => {
                        self.positions[link.a] += correction * 0.5;
                        self.positions[link.b] -= correction * 0.5;
                    }
                }
            }
        }
    }

    fn sync_particles(&mut self) {
        for (particle, p) in self.base.particles.iter_mut().zip(&self.positions) {
            particle.position = (*p).into();
        }
    }
}

impl Default for ClothSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for ClothSheet {
    fn kind(&self) -> DemoKind {
        DemoKind::ClothSheet
    }

    fn initialize(&mut self) -> EngineResult<()> {
        // Sheet lies horizontally and swings down from the pinned top row
        let top = (ROWS - 1) as f32 * SPACING * 0.5;
        self.positions = layout::grid(COLUMNS, ROWS, SPACING)
            .into_iter()
            .map(|p| Vector3::new(p.x, top + 4.0, p.y - top))
            .collect();
        self.previous = self.positions.clone();
        self.pinned = (0..self.positions.len())
            .map(|i| i / COLUMNS == ROWS - 1)
            .collect();
        self.links = Self::build_links(&self.positions);
        self.wind = 0.0;

        let particles = self
            .pinned
            .iter()
            .map(|&pinned| {
                let color = if pinned {
                    [1.0, 0.3, 0.2, 1.0]
                } else {
                    [0.9, 0.85, 0.6, 1.0]
                };
                ParticleVertex::new([0.0; 3], 0.12, color)
            })
            .collect();
        self.base.reset(particles);
        self.sync_particles();
        Ok(())
    }

    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.bind(context)
    }

    fn advance(&mut self) -> EngineResult<()> {
        self.integrate();
        self.relax();
        self.sync_particles();
        self.base.record_step();
        Ok(())
    }

    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        self.base.draw(context)
    }

    fn release(&mut self) -> EngineResult<()> {
        self.positions.clear();
        self.previous.clear();
        self.pinned.clear();
        self.links.clear();
        self.base.release();
        Ok(())
    }

    fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyW => self.wind = (self.wind + 2.0).min(10.0),
            KeyCode::KeyQ => self.wind = (self.wind - 2.0).max(-10.0),
            _ => {}
        }
    }

    fn step_count(&self) -> u64 {
        self.base.step_count
    }
}
