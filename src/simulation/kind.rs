use serde::{Deserialize, Serialize};

/// Identifier for each built-in demo module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    Fluid,
    TestGrid,
    ClothSheet,
    GalaxyNBody,
    RainParticles,
    AnimationPlayback,
    TransitionBlend,
}

impl DemoKind {
    /// Every kind, in demo-select key order (1..=7)
    pub const ALL: [DemoKind; 7] = [
        DemoKind::Fluid,
        DemoKind::TestGrid,
        DemoKind::ClothSheet,
        DemoKind::GalaxyNBody,
        DemoKind::RainParticles,
        DemoKind::AnimationPlayback,
        DemoKind::TransitionBlend,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DemoKind::Fluid => "Fluid",
            DemoKind::TestGrid => "Test grid",
            DemoKind::ClothSheet => "Cloth",
            DemoKind::GalaxyNBody => "Galaxy",
            DemoKind::RainParticles => "Rain",
            DemoKind::AnimationPlayback => "Animation",
            DemoKind::TransitionBlend => "Simulations transition",
        }
    }
}

impl Default for DemoKind {
    fn default() -> Self {
        DemoKind::Fluid
    }
}

impl std::fmt::Display for DemoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
