//! Frame timing

use std::time::{Duration, Instant};

/// Wall-clock frame timer
///
/// Produces the elapsed time fed into each synchronizer tick.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame) and return the new delta
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Seconds between the two most recent updates
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds accumulated over all updates
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of updates so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Mean frame rate over the whole run
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }

    /// Time left in the current frame to hit `target_fps`, if any
    pub fn remaining_frame_budget(&self, target_fps: u32) -> Option<Duration> {
        if target_fps == 0 {
            return None;
        }
        let budget = Duration::from_secs_f64(1.0 / f64::from(target_fps));
        budget.checked_sub(self.last_frame.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_counts_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.delta_time() >= 0.0);
        assert!(timer.total_time() >= timer.delta_time());
    }

    #[test]
    fn test_zero_target_fps_has_no_budget() {
        let timer = Timer::new();
        assert!(timer.remaining_frame_budget(0).is_none());
    }
}
