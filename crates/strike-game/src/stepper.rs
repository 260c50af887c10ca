//! Fixed-timestep accumulator.
//!
//! The caller measures (or scripts) frame time; the stepper turns it into a
//! whole number of 60 Hz simulation steps and carries the remainder.

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Frames longer than this are clamped, trading slowdown for a bounded
/// number of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    step_count: u64,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one frame of `frame_time` seconds and calls
    /// `step_fn(step_index, total_sim_time)` for every fixed step that fits.
    /// Returns the number of steps run.
    pub fn advance(&mut self, frame_time: f64, mut step_fn: impl FnMut(u32, f64)) -> u32 {
        let mut frame_time = if frame_time.is_finite() {
            frame_time.max(0.0)
        } else {
            0.0
        };

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            step_fn(steps, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.step_count += 1;
            steps += 1;
        }

        self.frame_count += 1;
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_frame_runs_one_step() {
        let mut stepper = FixedStepper::new();
        let steps = stepper.advance(FIXED_DT, |_, _| {});
        assert_eq!(steps, 1);
        assert!(stepper.alpha() < 1e-9);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut stepper = FixedStepper::new();
        let mut total = 0;
        for _ in 0..4 {
            total += stepper.advance(FIXED_DT / 2.0 + 1e-6, |_, _| {});
        }
        assert_eq!(total, 2);
        assert_eq!(stepper.frame_count(), 4);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clamped = FixedStepper::new();
        let mut direct = FixedStepper::new();
        let steps = clamped.advance(2.0, |_, _| {});

        assert_eq!(steps, direct.advance(MAX_FRAME_TIME, |_, _| {}));
        assert!((14..=15).contains(&steps), "got {steps} steps");
        assert!(clamped.total_sim_time() <= MAX_FRAME_TIME + 1e-9);
    }

    #[test]
    fn test_step_indices_and_sim_time() {
        let mut stepper = FixedStepper::new();
        let mut seen = Vec::new();
        stepper.advance(3.0 * FIXED_DT + 1e-6, |i, t| seen.push((i, t)));

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (0, 0.0));
        assert_eq!(seen[2].0, 2);
        assert!((seen[2].1 - 2.0 * FIXED_DT).abs() < 1e-12);
        assert_eq!(stepper.step_count(), 3);
    }

    #[test]
    fn test_alpha_reports_leftover() {
        let mut stepper = FixedStepper::new();
        stepper.advance(FIXED_DT * 1.5, |_, _| {});
        assert!((stepper.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bad_frame_time_runs_nothing() {
        let mut stepper = FixedStepper::new();
        assert_eq!(stepper.advance(f64::NAN, |_, _| {}), 0);
        assert_eq!(stepper.advance(-1.0, |_, _| {}), 0);
        assert_eq!(stepper.total_sim_time(), 0.0);
    }
}
