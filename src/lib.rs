// src/lib.rs
//! Particle Engine
//!
//! A real-time particle simulation viewer built on wgpu and winit. One demo
//! module runs at a time; the [`Orchestrator`](orchestrator::Orchestrator)
//! advances it, renders it, paces the loop and swaps modules on request.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod orchestrator;
pub mod performance;
pub mod prelude;
pub mod simulation;
pub mod wgpu_utils;

pub use app::ParticleApp;
pub use error::{EngineError, EngineResult};
