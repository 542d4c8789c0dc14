//! Camera and viewport

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Mat4, Vec3};

/// Perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position
    pub position: [f32; 3],
    /// Point the camera looks at
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: [15.0, 15.0, 30.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Right-handed view matrix
    pub fn view_matrix(&self) -> Mat4 {
        let eye = nalgebra::Point3::from(self.position);
        let target = nalgebra::Point3::from(self.target);
        Mat4::look_at_rh(&eye, &target, &Vec3::y())
    }

    /// Perspective projection for the given viewport
    pub fn projection_matrix(&self, viewport: &Viewport) -> Mat4 {
        Mat4::new_perspective(
            viewport.aspect(),
            self.fov_y_degrees * constants::DEG_TO_RAD,
            self.near,
            self.far,
        )
    }
}

/// Drawable surface size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    /// Physical pixels per logical pixel
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Width over height, 1.0 for a degenerate viewport
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
