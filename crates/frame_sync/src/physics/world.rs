//! Physics world configuration

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::math::Vec3;

/// Coarse collision-candidate pruning strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Broadphase {
    /// Test every pair
    BruteForce,
    /// Sort-and-sweep along axes
    SweepAndPrune,
    /// Bounding volume hierarchy
    BoundingVolumeTree,
}

/// How elapsed frame time is turned into physics steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepPolicy {
    /// Exactly one fixed step per tick, whatever the elapsed time
    PerFrame,
    /// Accumulate elapsed time and take as many fixed steps as it covers
    Accumulated {
        /// Upper bound on steps in one tick; older backlog is dropped
        max_substeps: u32,
    },
}

impl Default for StepPolicy {
    fn default() -> Self {
        Self::Accumulated { max_substeps: 8 }
    }
}

/// Physics world settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity vector (m/s²)
    pub gravity: [f32; 3],
    /// Fixed simulation step in seconds
    pub timestep: f32,
    /// Solver iterations per step
    pub iterations: u32,
    /// Requested broad-phase strategy
    pub broadphase: Broadphase,
    /// Frame time to step conversion
    pub step_policy: StepPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            timestep: 1.0 / 60.0,
            iterations: 8,
            broadphase: Broadphase::SweepAndPrune,
            step_policy: StepPolicy::default(),
        }
    }
}

impl WorldConfig {
    /// Gravity as a vector
    pub fn gravity(&self) -> Vec3 {
        Vec3::from(self.gravity)
    }

    /// Builder pattern: Set step policy
    #[must_use]
    pub fn with_step_policy(mut self, policy: StepPolicy) -> Self {
        self.step_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.iterations == 0 {
            return Err(ConfigError::Invalid("solver iterations must be at least 1".to_string()));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        if self.step_policy == (StepPolicy::Accumulated { max_substeps: 0 }) {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".to_string()));
        }
        Ok(())
    }
}
