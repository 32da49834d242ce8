//! Fixed-step frame scheduler
//!
//! Turns irregular display-refresh timestamps into a whole number of fixed
//! simulation ticks. The accumulator carries the remainder between frames.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, TICK_MS};

#[derive(Debug, Clone, PartialEq)]
pub struct FixedStep {
    step_ms: f32,
    accumulator: f32,
    last_time: Option<f64>,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

impl FixedStep {
    pub fn new(step_ms: f32) -> Self {
        Self {
            step_ms,
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Elapsed milliseconds since the previous frame timestamp.
    ///
    /// The first frame counts as exactly one tick.
    pub fn elapsed(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => self.step_ms,
        };
        self.last_time = Some(now_ms);
        dt
    }

    /// Bank `elapsed_ms` and return how many ticks to run now
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        // Clamp to avoid spiral of death after a stall
        self.accumulator += elapsed_ms.clamp(0.0, MAX_FRAME_MS);

        let mut ticks = 0;
        while self.accumulator >= self.step_ms && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.step_ms;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            // Drop the backlog instead of replaying it next frame
            self.accumulator = self.accumulator.min(self.step_ms);
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut s = FixedStep::default();
        let dt = s.elapsed(1234.0);
        assert_eq!(s.advance(dt), 1);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut s = FixedStep::new(10.0);
        assert_eq!(s.advance(15.0), 1);
        assert_eq!(s.advance(5.0), 1);
        assert_eq!(s.advance(9.0), 0);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut s = FixedStep::new(10.0);
        // 5 seconds in a background tab still counts as 100ms, capped at 8 ticks
        assert_eq!(s.advance(5000.0), 8);
        assert!(s.advance(0.0) <= 1);
    }

    #[test]
    fn test_elapsed_tracks_timestamps() {
        let mut s = FixedStep::new(10.0);
        assert_eq!(s.elapsed(100.0), 10.0);
        assert_eq!(s.elapsed(133.0), 33.0);
        // Clock going backwards never yields negative time
        assert_eq!(s.elapsed(120.0), 0.0);
    }
}
