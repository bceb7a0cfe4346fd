// src/simulation/mod.rs
//! Simulation modules
//!
//! Every scenario the viewer can run implements [`Demo`]. The orchestrator
//! keeps one instance in a [`DemoSlot`] and builds replacements through a
//! [`DemoFactory`]; [`BuiltinDemos`] is the factory for the shipped demos.

pub mod cpu;
pub mod demos;
pub mod kind;
pub mod manager;
pub mod traits;

pub use demos::BuiltinDemos;
pub use kind::DemoKind;
pub use manager::{DemoFactory, DemoSlot};
pub use traits::Demo;
