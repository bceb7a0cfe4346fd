use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Phase timer and frame-rate limiter.
///
/// Phase durations are diagnostics only; nothing in the frame loop branches
/// on them. The only blocking call is [`Pacer::suspend`].
pub struct Pacer {
    target_budget: Duration,
    limit_frame_rate: bool,
    phases: HashMap<String, Instant>,
    frame_start: Instant,
}

impl Pacer {
    /// Creates a pacer holding `target_fps` frames per second (0 disables
    /// the limit).
    pub fn new(target_fps: u32) -> Self {
        let target_budget = if target_fps > 0 {
            Duration::from_nanos(1_000_000_000 / target_fps as u64)
        } else {
            Duration::ZERO
        };

        Self {
            target_budget,
            limit_frame_rate: target_fps > 0,
            phases: HashMap::new(),
            frame_start: Instant::now(),
        }
    }

    pub fn with_frame_limit(mut self, enabled: bool) -> Self {
        self.limit_frame_rate = enabled && !self.target_budget.is_zero();
        self
    }

    pub fn target_budget(&self) -> Duration {
        self.target_budget
    }

    pub fn limits_frame_rate(&self) -> bool {
        self.limit_frame_rate
    }

    /// Starts (or restarts) the timer for `name`.
    pub fn begin_phase(&mut self, name: &str) {
        self.phases.insert(name.to_owned(), Instant::now());
    }

    /// Stops the timer for `name` and returns how long it ran.
    ///
    /// A phase that was never begun measures as zero.
    pub fn end_phase(&mut self, name: &str) -> Duration {
        match self.phases.remove(name) {
            Some(start) => {
                let elapsed = start.elapsed();
                log::debug!("{name}: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
                elapsed
            }
            None => {
                log::warn!("phase '{name}' ended without being started");
                Duration::ZERO
            }
        }
    }

    /// Restarts the free-running frame timer.
    pub fn restart_frame_timer(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Time since the frame timer was last restarted.
    pub fn frame_elapsed(&self) -> Duration {
        self.frame_start.elapsed()
    }

    /// `max(0, target_budget - measured)`.
    pub fn sleep_for(target_budget: Duration, measured: Duration) -> Duration {
        target_budget.saturating_sub(measured)
    }

    /// Time left in this frame's budget, zero when limiting is off.
    pub fn remaining(&self, measured: Duration) -> Duration {
        if self.limit_frame_rate {
            Self::sleep_for(self.target_budget, measured)
        } else {
            Duration::ZERO
        }
    }

    /// Blocks the calling thread for `duration`.
    pub fn suspend(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
