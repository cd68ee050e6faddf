//! Fixed-step clock
//!
//! Splits variable frame time into fixed physics ticks. Hosts that already own a
//! physics callback do not need this; the demo binary and tests use it to drive
//! the physics-rate phase separately from the pose-application phase.

/// Accumulator that turns frame deltas into a bounded number of fixed steps.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    max_steps_per_frame: usize,
    accumulator: f32,
}

impl FixedStepClock {
    /// Create a clock ticking every `step` seconds, running at most
    /// `max_steps_per_frame` ticks per frame.
    pub fn new(step: f32, max_steps_per_frame: usize) -> Self {
        Self {
            step,
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: 0.0,
        }
    }

    /// Fixed step length in seconds.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Leftover time not yet consumed by a tick, as a fraction of one step.
    pub fn alpha(&self) -> f32 {
        if self.step > 0.0 {
            self.accumulator / self.step
        } else {
            0.0
        }
    }

    /// Feed a frame delta and return how many fixed ticks to run this frame.
    ///
    /// Backlog beyond `max_steps_per_frame` is dropped so a long stall does not
    /// trigger a catch-up spiral.
    pub fn advance(&mut self, frame_dt: f32) -> usize {
        if self.step <= 0.0 {
            return 0;
        }
        let cap = self.step * self.max_steps_per_frame as f32;
        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(cap);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStepClock::new(0.02, 8);
        assert_eq!(clock.advance(0.015), 0);
        assert_eq!(clock.advance(0.015), 1);
        assert!((clock.alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_caps_steps_per_frame() {
        let mut clock = FixedStepClock::new(0.25, 4);
        assert_eq!(clock.advance(10.0), 4);
        // Backlog was dropped, not carried
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut clock = FixedStepClock::new(0.02, 4);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
