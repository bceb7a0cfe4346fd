//! # Frame pacing and timing
//!
//! [`Pacer`] brackets named phases, measures the free-running frame duration
//! and computes how long to sleep to hold a target frame budget.
//! [`FrameStats`] keeps a short history of frame durations for the periodic
//! FPS summary in the log.
//!
//! ## Usage
//!
//! ```rust
//! use particle_engine::performance::Pacer;
//! use std::time::Duration;
//!
//! let mut pacer = Pacer::new(60);
//! pacer.begin_phase("Renderer");
//! // ... render frame ...
//! let measured = pacer.end_phase("Renderer");
//! let sleep = Pacer::sleep_for(pacer.target_budget(), measured);
//! assert!(sleep <= Duration::from_millis(17));
//! ```

mod pacer;

pub use pacer::Pacer;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Summary of the recent frame history
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMetrics {
    /// Frames per second from the average frame time
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
        }
    }
}

/// Rolling window of measured frame durations
pub struct FrameStats {
    /// Ring buffer of recent frame times
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    current_metrics: FrameMetrics,
    last_report: Instant,
    report_interval: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::with_capacity(120) // ~2 seconds at 60fps
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            current_metrics: FrameMetrics::default(),
            last_report: Instant::now(),
            report_interval: Duration::from_secs(1),
        }
    }

    /// Adds one measured frame and refreshes the summary.
    pub fn record(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        self.update_metrics();

        let frame_ms = frame_time.as_secs_f32() * 1000.0;
        let fps = if frame_ms > 0.0 { 1000.0 / frame_ms } else { 0.0 };
        log::trace!("FPS: {fps:.1}\tFrame duration: {frame_ms:.3}ms");

        if self.last_report.elapsed() >= self.report_interval {
            let m = &self.current_metrics;
            log::info!(
                "{:.1} fps (avg {:.2}ms, min {:.2}ms, max {:.2}ms)",
                m.fps,
                m.frame_time_ms,
                m.min_frame_time_ms,
                m.max_frame_time_ms
            );
            self.last_report = Instant::now();
        }
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total_time / self.frame_times.len() as u32;
        let avg_frame_time_ms = avg_frame_time.as_secs_f32() * 1000.0;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.current_metrics
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}
