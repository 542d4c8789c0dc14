//! Frame time to physics step conversion

use crate::physics::StepPolicy;

/// Decides how many fixed steps each tick takes
#[derive(Debug, Clone)]
pub struct FixedStepper {
    timestep: f32,
    policy: StepPolicy,
    accumulator: f32,
}

impl FixedStepper {
    /// Create a stepper for a world with the given fixed timestep
    pub const fn new(timestep: f32, policy: StepPolicy) -> Self {
        Self {
            timestep,
            policy,
            accumulator: 0.0,
        }
    }

    /// Number of steps to take for a frame that lasted `elapsed` seconds
    ///
    /// Negative or non-finite input counts as zero. Under
    /// [`StepPolicy::Accumulated`] the leftover fraction of a step carries
    /// over, and backlog beyond `max_substeps` is dropped.
    pub fn steps_for(&mut self, elapsed: f32) -> u32 {
        let elapsed = sanitize(elapsed);
        match self.policy {
            StepPolicy::PerFrame => 1,
            StepPolicy::Accumulated { max_substeps } => {
                self.accumulator += elapsed;
                let mut steps = 0;
                while self.accumulator >= self.timestep && steps < max_substeps {
                    self.accumulator -= self.timestep;
                    steps += 1;
                }
                if self.accumulator >= self.timestep {
                    log::debug!(
                        "Dropping {:.3}s of physics backlog after {steps} substeps",
                        self.accumulator
                    );
                    self.accumulator %= self.timestep;
                }
                steps
            }
        }
    }

    /// Time carried into the next tick
    pub const fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Active policy
    pub const fn policy(&self) -> StepPolicy {
        self.policy
    }
}

/// Clamp frame time to a usable value
pub fn sanitize(elapsed: f32) -> f32 {
    if elapsed.is_finite() && elapsed > 0.0 {
        elapsed
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_per_frame_always_one_step() {
        let mut stepper = FixedStepper::new(DT, StepPolicy::PerFrame);
        assert_eq!(stepper.steps_for(0.0), 1);
        assert_eq!(stepper.steps_for(1.0), 1);
        assert_eq!(stepper.steps_for(-5.0), 1);
    }

    #[test]
    fn test_accumulated_carries_remainder() {
        let mut stepper = FixedStepper::new(0.01, StepPolicy::Accumulated { max_substeps: 8 });
        assert_eq!(stepper.steps_for(0.025), 2);
        assert_relative_eq!(stepper.accumulated(), 0.005, epsilon = 1e-6);
        assert_eq!(stepper.steps_for(0.006), 1);
    }

    #[test]
    fn test_accumulated_drops_backlog() {
        let mut stepper = FixedStepper::new(DT, StepPolicy::Accumulated { max_substeps: 4 });
        assert_eq!(stepper.steps_for(1.0), 4);
        assert!(stepper.accumulated() < DT);
    }

    #[test]
    fn test_bad_elapsed_counts_as_zero() {
        let mut stepper = FixedStepper::new(DT, StepPolicy::Accumulated { max_substeps: 8 });
        assert_eq!(stepper.steps_for(f32::NAN), 0);
        assert_eq!(stepper.steps_for(-1.0), 0);
        assert_eq!(stepper.accumulated(), 0.0);
    }
}
