//! # Particle Engine Prelude
//!
//! Commonly used types for writing a demo module and running it.
//!
//! ```no_run
//! use particle_engine::prelude::*;
//!
//! struct Spark {
//!     base: CpuDemoBase,
//! }
//!
//! impl Demo for Spark {
//!     fn kind(&self) -> DemoKind { DemoKind::TestGrid }
//!     fn name(&self) -> &str { "Spark" }
//!     fn initialize(&mut self) -> EngineResult<()> {
//!         self.base.reset(vec![ParticleVertex::new([0.0; 3], 0.5, [1.0; 4])]);
//!         Ok(())
//!     }
//!     fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()> {
//!         self.base.bind(context)
//!     }
//!     fn advance(&mut self) -> EngineResult<()> {
//!         self.base.record_step();
//!         Ok(())
//!     }
//!     fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()> {
//!         self.base.draw(context)
//!     }
//!     fn release(&mut self) -> EngineResult<()> {
//!         self.base.release();
//!         Ok(())
//!     }
//!     fn step_count(&self) -> u64 { self.base.step_count }
//! }
//! ```

pub use crate::app::ParticleApp;
pub use crate::config::ViewerConfig;
pub use crate::error::{EngineError, EngineResult};

pub use crate::gfx::rendering::{BatchHandle, DisplayFlag, ParticleVertex, RenderContext, Renderer};
pub use crate::orchestrator::{Control, Orchestrator};

pub use crate::simulation::cpu::CpuDemoBase;
pub use crate::simulation::{BuiltinDemos, Demo, DemoFactory, DemoKind};

pub use winit::keyboard::KeyCode;
