//! Fixed-timestep accumulator
//!
//! Hosts render at whatever rate the display gives them; the simulation only
//! ever sees `SIM_DT`. Each frame the host calls `advance` with the real frame
//! time and runs `tick` that many times.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepper {
    step: f32,
    accumulator: f32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStepper {
    /// A step that is not a positive finite number falls back to `SIM_DT`.
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("Invalid step {}, using {}", step, SIM_DT);
            SIM_DT
        };
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Bank a frame's worth of time and return how many steps to run.
    ///
    /// Long frames (tab switch, debugger) are clamped and the step count is
    /// capped to prevent a spiral of death; time beyond the cap is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS && self.accumulator >= self.step {
            log::debug!("stepper behind, dropping {:.3}s", self.accumulator);
            self.accumulator %= self.step;
        }
        steps
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_frames() {
        let mut stepper = FixedStepper::default();
        let total: u32 = (0..60).map(|_| stepper.advance(SIM_DT)).sum();
        // Float drift can leave the last step in the bank
        assert!((59..=60).contains(&total), "ran {total} steps");
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut stepper = FixedStepper::new(0.01);
        assert_eq!(stepper.advance(0.025), 2);
        assert!((stepper.alpha() - 0.5).abs() < 1e-3);
        assert_eq!(stepper.advance(0.006), 1);
        assert!(stepper.alpha() < 0.2);
    }

    #[test]
    fn test_long_frame_is_capped() {
        // 0.25 s of 10 ms steps is well past the cap
        let mut stepper = FixedStepper::new(0.01);
        assert_eq!(stepper.advance(5.0), MAX_SUBSTEPS);
        assert!(stepper.alpha() < 1.0);
        // The backlog was dropped, not banked
        assert!(stepper.advance(0.01) <= 2);
    }

    #[test]
    fn test_bad_frame_times_ignored() {
        let mut stepper = FixedStepper::default();
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.advance(f32::NAN), 0);
        assert_eq!(stepper.alpha(), 0.0);
    }

    #[test]
    fn test_invalid_step_falls_back() {
        for step in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut stepper = FixedStepper::new(step);
            assert_eq!(stepper.step(), SIM_DT);
            assert!(stepper.advance(5.0) > 0);
            assert!(stepper.alpha().is_finite());
            assert!(stepper.advance(SIM_DT * 1.5) >= 1);
        }
    }
}
