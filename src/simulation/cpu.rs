//! Shared state for CPU-side demos
//!
//! Every built-in demo keeps its particles in host memory and mirrors them
//! into one render batch. [`CpuDemoBase`] owns that mirror and the step
//! counter so each demo only writes its own stepping logic.

use crate::error::{EngineError, EngineResult};
use crate::gfx::rendering::{BatchHandle, ParticleVertex, RenderContext};

use super::kind::DemoKind;

pub struct CpuDemoBase {
    pub kind: DemoKind,
    pub particles: Vec<ParticleVertex>,
    pub step_count: u64,
    batch: Option<BatchHandle>,
}

impl CpuDemoBase {
    pub fn new(kind: DemoKind) -> Self {
        Self {
            kind,
            particles: Vec::new(),
            step_count: 0,
            batch: None,
        }
    }

    /// Starts a fresh run with `particles` as the initial state.
    pub fn reset(&mut self, particles: Vec<ParticleVertex>) {
        self.particles = particles;
        self.step_count = 0;
        self.batch = None;
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    /// Registers one batch sized for the current particle count.
    pub fn bind(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
        if self.particles.is_empty() {
            return Err(EngineError::Initialization(format!(
                "{} bound before initialize",
                self.kind
            )));
        }
        let batch = context.create_batch(self.kind.label(), self.particles.len())?;
        self.batch = Some(batch);
        Ok(())
    }

    /// Uploads the particles and queues the batch.
    pub fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
        let batch = self.batch.ok_or_else(|| {
            EngineError::RuntimeStep(format!("{} drawn without a render batch", self.kind))
        })?;
        context.update_batch(batch, &self.particles)?;
        context.draw_batch(batch)
    }

    pub fn batch(&self) -> Option<BatchHandle> {
        self.batch
    }

    pub fn release(&mut self) {
        self.particles.clear();
        self.particles.shrink_to_fit();
        self.batch = None;
    }
}
