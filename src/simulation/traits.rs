//! Capability set every demo module implements
//!
//! The orchestrator owns exactly one demo at a time and drives it through
//! this trait: `initialize` → `bind_to_renderer` → (`advance` / `draw`)* →
//! `release`.

use winit::keyboard::KeyCode;

use super::kind::DemoKind;
use crate::error::EngineResult;
use crate::gfx::rendering::RenderContext;

/// A swappable simulation scenario
pub trait Demo {
    /// Which scenario this instance runs
    fn kind(&self) -> DemoKind;

    /// Display name for logs
    fn name(&self) -> &str {
        self.kind().label()
    }

    /// Allocates simulation state.
    ///
    /// Fails with [`EngineError::Initialization`](crate::error::EngineError::Initialization)
    /// when resources cannot be allocated.
    fn initialize(&mut self) -> EngineResult<()>;

    /// Registers drawable resources with a freshly initialized render context.
    fn bind_to_renderer(&mut self, context: &mut dyn RenderContext) -> EngineResult<()>;

    /// Performs one simulation step.
    fn advance(&mut self) -> EngineResult<()>;

    /// Submits the current drawable state. Must not change simulation state.
    fn draw(&self, context: &mut dyn RenderContext) -> EngineResult<()>;

    /// Frees everything the demo owns.
    ///
    /// Safe to call after a partial or failed `initialize`, and more than once.
    fn release(&mut self) -> EngineResult<()>;

    /// Module-specific key handling. Unknown keys are ignored.
    fn handle_input(&mut self, _key: KeyCode) {}

    /// Number of `advance` calls since the last `initialize`
    fn step_count(&self) -> u64;
}
