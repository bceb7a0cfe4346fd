//! Error types for the particle engine
//!
//! Errors are split by how the frame loop reacts to them: initialization
//! failures (module or render context) are fatal, runtime step failures are
//! reported and the loop moves on to the next tick.

use thiserror::Error;

/// Errors produced by the engine, its renderer and its demo modules.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A demo module or renderer could not allocate the resources it needs.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// The render context could not acquire its target surface or device.
    #[error("device initialization failed: {0}")]
    DeviceInitialization(String),

    /// A single advance/draw/frame call failed. The session stays alive.
    #[error("runtime step failed: {0}")]
    RuntimeStep(String),

    /// Options file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Window event loop failure.
    #[error("event loop error: {0}")]
    EventLoop(String),
}

impl EngineError {
    /// Whether the frame loop must stop when this error surfaces.
    ///
    /// Only runtime step errors are survivable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::RuntimeStep(_))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Config(e.to_string())
    }
}

impl From<wgpu::CreateSurfaceError> for EngineError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        EngineError::DeviceInitialization(format!("failed to create surface: {e}"))
    }
}

impl From<wgpu::RequestAdapterError> for EngineError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        EngineError::DeviceInitialization(format!("no compatible adapter: {e}"))
    }
}

impl From<wgpu::RequestDeviceError> for EngineError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        EngineError::DeviceInitialization(format!("failed to request device: {e}"))
    }
}

impl From<wgpu::SurfaceError> for EngineError {
    fn from(e: wgpu::SurfaceError) -> Self {
        EngineError::RuntimeStep(format!("surface error: {e}"))
    }
}

/// Convenience result alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_runtime_step_is_survivable() {
        assert!(!EngineError::RuntimeStep("bad frame".into()).is_fatal());
        assert!(EngineError::Initialization("oom".into()).is_fatal());
        assert!(EngineError::DeviceInitialization("no adapter".into()).is_fatal());
        assert!(EngineError::Config("parse".into()).is_fatal());
    }

    #[test]
    fn test_display_includes_cause() {
        let err = EngineError::DeviceInitialization("surface lost".into());
        assert_eq!(err.to_string(), "device initialization failed: surface lost");
    }
}
