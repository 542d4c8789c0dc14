//! Math utilities and types
//!
//! Thin aliases over nalgebra so scene, physics and config code agree on one
//! vector and rotation representation.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Unit quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Position, rotation and scale of a scene object
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder pattern: Set scale (uniform)
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// One of the three world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis (up)
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Index of this axis into a `Vec3`
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Vector of length `amount` along this axis
    pub fn scaled(self, amount: f32) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = amount;
        v
    }
}

/// Rotation from XYZ Euler angles in radians
pub fn quat_from_euler(angles: Vec3) -> Quat {
    Quat::from_euler_angles(angles.x, angles.y, angles.z)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_scaled_touches_one_component() {
        assert_eq!(Axis::Y.scaled(10.0), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(Axis::Z.scaled(-1.0), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_quat_from_euler_matches_axis_angle() {
        let q = quat_from_euler(Vec3::new(0.0, constants::HALF_PI, 0.0));
        let expected = Quat::from_axis_angle(&Vec3::y_axis(), constants::HALF_PI);
        assert_relative_eq!(q, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_matrix_carries_translation() {
        let t = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), Quat::identity());
        let m = t.to_matrix();
        assert_relative_eq!(m[(0, 3)], 1.0);
        assert_relative_eq!(m[(1, 3)], 2.0);
        assert_relative_eq!(m[(2, 3)], 3.0);
    }
}
