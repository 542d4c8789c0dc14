//! Constant-rate procedural rotation

use crate::foundation::math::{quat_from_euler, Quat, Vec3};

/// Per-tick Euler rotation with a joint wraparound reset
///
/// Every tick adds `rate` to the accumulated angles. An axis is *tracked* when
/// its rate is non-zero. As soon as any tracked angle exceeds the wrap
/// threshold, every tracked angle is reset to zero in the same tick.
///
/// The angles are radians while the default threshold is the literal `360.0`,
/// so at small rates the reset is effectively never reached. The threshold is
/// kept as configured rather than reinterpreted in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    rate: Vec3,
    angles: Vec3,
    wrap_threshold: f32,
}

impl Spin {
    /// Threshold used when none is configured
    pub const DEFAULT_WRAP_THRESHOLD: f32 = 360.0;

    /// Create a spin starting at zero angles
    pub fn new(rate: Vec3, wrap_threshold: f32) -> Self {
        Self {
            rate,
            angles: Vec3::zeros(),
            wrap_threshold,
        }
    }

    /// Apply one tick; returns `true` if the angles wrapped
    pub fn advance(&mut self) -> bool {
        let mut wrapped = false;
        for axis in 0..3 {
            if self.is_tracked(axis) {
                self.angles[axis] += self.rate[axis];
                wrapped |= self.angles[axis] > self.wrap_threshold;
            }
        }

        if wrapped {
            for axis in 0..3 {
                if self.is_tracked(axis) {
                    self.angles[axis] = 0.0;
                }
            }
        }
        wrapped
    }

    fn is_tracked(&self, axis: usize) -> bool {
        self.rate[axis] != 0.0
    }

    /// Accumulated Euler angles in radians
    pub const fn angles(&self) -> Vec3 {
        self.angles
    }

    /// Per-tick rate in radians
    pub const fn rate(&self) -> Vec3 {
        self.rate
    }

    /// Configured wraparound threshold
    pub const fn wrap_threshold(&self) -> f32 {
        self.wrap_threshold
    }

    /// Accumulated angles as a rotation
    pub fn rotation(&self) -> Quat {
        quat_from_euler(self.angles)
    }
}
