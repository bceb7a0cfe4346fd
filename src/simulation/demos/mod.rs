//! Built-in demo modules
//!
//! All of them are CPU simulations mirrored into a single particle batch.

mod animation;
mod cloth;
mod fluid;
mod galaxy;
pub mod layout;
mod rain;
mod test_grid;
mod transition;

pub use animation::AnimationPlayback;
pub use cloth::ClothSheet;
pub use fluid::Fluid;
pub use galaxy::GalaxyNBody;
pub use rain::RainParticles;
pub use test_grid::TestGrid;
pub use transition::TransitionBlend;

use super::{kind::DemoKind, manager::DemoFactory, traits::Demo};

/// Factory for the demos shipped with the engine
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDemos;

impl DemoFactory for BuiltinDemos {
    fn create(&self, kind: DemoKind) -> Box<dyn Demo> {
        match kind {
            DemoKind::Fluid => Box::new(Fluid::new()),
            DemoKind::TestGrid => Box::new(TestGrid::new()),
            DemoKind::ClothSheet => Box::new(ClothSheet::new()),
            DemoKind::GalaxyNBody => Box::new(GalaxyNBody::new()),
            DemoKind::RainParticles => Box::new(RainParticles::new()),
            DemoKind::AnimationPlayback => Box::new(AnimationPlayback::new()),
            DemoKind::TransitionBlend => Box::new(TransitionBlend::new()),
        }
    }
}
