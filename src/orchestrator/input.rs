//! Pointer/wheel deltas accumulated between ticks
//!
//! The window layer records raw events into an [`InputDeltaBuffer`]; the
//! orchestrator drains it once per tick. Draining resets the wheel to zero
//! and moves the drag anchor to the current pointer, so deltas are
//! frame-relative rather than cumulative.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Wheel units per notch, matching the classic Win32 `WHEEL_DELTA`
pub const WHEEL_UNITS_PER_NOTCH: f32 = 120.0;

/// Net input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameDeltas {
    /// Wheel notches, positive away from the user
    pub wheel: f32,
    /// Pointer movement since the last drain while the drag button is held
    pub drag_dx: f32,
    pub drag_dy: f32,
}

impl FrameDeltas {
    pub fn is_zero(&self) -> bool {
        self.wheel == 0.0 && self.drag_dx == 0.0 && self.drag_dy == 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDeltaBuffer {
    wheel_delta: f32,
    anchor: (f32, f32),
    pointer: (f32, f32),
    drag_held: bool,
}

impl InputDeltaBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds wheel movement in notches.
    pub fn add_wheel(&mut self, notches: f32) {
        self.wheel_delta += notches;
    }

    /// Adds wheel movement in pixels (trackpads), converted to notches.
    pub fn add_wheel_pixels(&mut self, pixels: f32) {
        self.wheel_delta += pixels / WHEEL_UNITS_PER_NOTCH;
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    /// Pressing re-anchors at the current pointer so a drag never starts
    /// with a jump.
    pub fn set_drag_held(&mut self, held: bool) {
        if held && !self.drag_held {
            self.anchor = self.pointer;
        }
        self.drag_held = held;
    }

    pub fn drag_held(&self) -> bool {
        self.drag_held
    }

    /// Returns the net deltas since the previous drain and clears them.
    pub fn drain(&mut self) -> FrameDeltas {
        let (drag_dx, drag_dy) = if self.drag_held {
            (self.pointer.0 - self.anchor.0, self.pointer.1 - self.anchor.1)
        } else {
            (0.0, 0.0)
        };
        let deltas = FrameDeltas {
            wheel: self.wheel_delta,
            drag_dx,
            drag_dy,
        };

        self.wheel_delta = 0.0;
        self.anchor = self.pointer;
        deltas
    }
}

/// Cloneable handle to a buffer shared with an input source.
///
/// Recording and draining each take the lock once, so a drain is a single
/// read-and-clear critical section even when events arrive from another
/// thread.
#[derive(Debug, Clone, Default)]
pub struct SharedInputBuffer {
    inner: Arc<Mutex<InputDeltaBuffer>>,
}

impl SharedInputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InputDeltaBuffer> {
        // A panicking writer cannot leave the buffer half-updated
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the buffer under the lock.
    pub fn record<R>(&self, f: impl FnOnce(&mut InputDeltaBuffer) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn drain(&self) -> FrameDeltas {
        self.lock().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_twice_yields_zero() {
        let mut buffer = InputDeltaBuffer::new();
        buffer.set_pointer(10.0, 10.0);
        buffer.set_drag_held(true);
        buffer.add_wheel(2.0);
        buffer.set_pointer(25.0, 4.0);

        let first = buffer.drain();
        assert_eq!(
            first,
            FrameDeltas {
                wheel: 2.0,
                drag_dx: 15.0,
                drag_dy: -6.0
            }
        );
        assert!(buffer.drain().is_zero());
    }

    #[test]
    fn test_drag_ignored_when_button_released() {
        let mut buffer = InputDeltaBuffer::new();
        buffer.set_pointer(0.0, 0.0);
        buffer.set_pointer(50.0, 50.0);
        let deltas = buffer.drain();
        assert_eq!(deltas.drag_dx, 0.0);
        assert_eq!(deltas.drag_dy, 0.0);
    }

    #[test]
    fn test_deltas_are_frame_relative() {
        let mut buffer = InputDeltaBuffer::new();
        buffer.set_drag_held(true);
        buffer.set_pointer(5.0, 0.0);
        assert_eq!(buffer.drain().drag_dx, 5.0);

        buffer.set_pointer(8.0, 0.0);
        assert_eq!(buffer.drain().drag_dx, 3.0);
    }

    #[test]
    fn test_press_anchors_at_pointer() {
        let mut buffer = InputDeltaBuffer::new();
        buffer.set_pointer(100.0, 100.0);
        buffer.set_drag_held(true);
        assert!(buffer.drain().is_zero());
    }

    #[test]
    fn test_pixel_wheel_converts_to_notches() {
        let mut buffer = InputDeltaBuffer::new();
        buffer.add_wheel_pixels(240.0);
        assert_eq!(buffer.drain().wheel, 2.0);
    }

    #[test]
    fn test_shared_buffer_accumulates_across_threads() {
        let shared = SharedInputBuffer::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let writer = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        writer.record(|b| b.add_wheel(1.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.drain().wheel, 400.0);
        assert_eq!(shared.drain().wheel, 0.0);
    }
}
