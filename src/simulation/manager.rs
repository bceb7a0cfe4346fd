//! Single-owner slot for the active demo
//!
//! The slot holds at most one demo. Replacing it is split into
//! [`DemoSlot::release_active`] and [`DemoSlot::install`] so the caller can
//! tear down other resources in between; the old instance is released and
//! dropped before a new one can be installed.

use super::{kind::DemoKind, traits::Demo};

/// Builds demo instances on request
pub trait DemoFactory {
    fn create(&self, kind: DemoKind) -> Box<dyn Demo>;
}

impl<F> DemoFactory for F
where
    F: Fn(DemoKind) -> Box<dyn Demo>,
{
    fn create(&self, kind: DemoKind) -> Box<dyn Demo> {
        self(kind)
    }
}

/// Holds the active demo module
#[derive(Default)]
pub struct DemoSlot {
    demo: Option<Box<dyn Demo>>,
}

impl DemoSlot {
    pub fn new() -> Self {
        Self { demo: None }
    }

    /// Releases and drops the active demo, returning its kind.
    ///
    /// A failing `release` is logged, never propagated.
    pub fn release_active(&mut self) -> Option<DemoKind> {
        let mut old = self.demo.take()?;
        let kind = old.kind();
        if let Err(e) = old.release() {
            log::warn!("{} did not release cleanly: {e}", old.name());
        }
        drop(old);
        Some(kind)
    }

    /// Makes `demo` the active module. The slot must be empty.
    pub fn install(&mut self, demo: Box<dyn Demo>) {
        debug_assert!(self.demo.is_none(), "demo slot already occupied");
        if let Some(previous) = self.demo.replace(demo) {
            log::error!("{} replaced without being released", previous.name());
        }
    }

    pub fn active(&self) -> Option<&dyn Demo> {
        self.demo.as_deref()
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn Demo + 'static)> {
        self.demo.as_deref_mut()
    }

    pub fn active_kind(&self) -> Option<DemoKind> {
        self.demo.as_ref().map(|d| d.kind())
    }

    pub fn is_empty(&self) -> bool {
        self.demo.is_none()
    }
}
