// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame timing.
//!
//! [`FrameClock`] is ticked once at the start of each frame; the hub reads
//! `now()` (seconds since the clock was created) and feeds it to the
//! sequencer and door controller.

use std::time::{Duration, Instant};

/// Monotonic per-frame clock
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    frame_count: u64,
}

impl FrameClock {
    /// Start a clock at zero
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Call at the start of each frame
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        self.frame_count += 1;
    }

    /// Seconds from clock creation to the current frame
    pub fn now(&self) -> f64 {
        (self.frame_start - self.startup).as_secs_f64()
    }

    /// Duration of the previous frame in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
