//! Data-driven object descriptors
//!
//! One [`ObjectDesc`] describes a scene object, a rigid body, or both. The
//! session setup routine turns a list of them into scene objects, bodies and
//! bindings.

use serde::{Deserialize, Serialize};

use super::{Appearance, Geometry};
use crate::animation::Spin;
use crate::foundation::math::{quat_from_euler, Transform, Vec3};
use crate::physics::BodyDesc;

/// Visual half of an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualDesc {
    /// Shape to draw
    pub geometry: Geometry,
    /// Colour, material and visibility
    #[serde(default)]
    pub appearance: Appearance,
}

/// Constant-rate rotation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinDesc {
    /// Radians added per tick on X, Y and Z
    pub rate: [f32; 3],
    /// Accumulated value above which all spinning axes reset to zero
    #[serde(default = "default_wrap_threshold")]
    pub wrap_threshold: f32,
}

const fn default_wrap_threshold() -> f32 {
    Spin::DEFAULT_WRAP_THRESHOLD
}

impl SpinDesc {
    /// Runtime spin state
    pub fn to_spin(&self) -> Spin {
        Spin::new(Vec3::from(self.rate), self.wrap_threshold)
    }
}

/// One entry of the scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    /// Name, used for logs, input bindings and asset tracks
    pub name: String,
    /// Initial position
    #[serde(default)]
    pub position: [f32; 3],
    /// Initial rotation as XYZ Euler angles in radians
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Drawable, if any
    #[serde(default)]
    pub visual: Option<VisualDesc>,
    /// Rigid body, if any
    #[serde(default)]
    pub body: Option<BodyDesc>,
    /// Procedural rotation, if any
    #[serde(default)]
    pub spin: Option<SpinDesc>,
    /// Drive the visual from the body when both exist
    #[serde(default = "default_bind")]
    pub bind: bool,
}

const fn default_bind() -> bool {
    true
}

impl ObjectDesc {
    /// Descriptor with only a name; fill the rest with the builders
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            visual: None,
            body: None,
            spin: None,
            bind: default_bind(),
        }
    }

    /// Builder pattern: Set position
    #[must_use]
    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set Euler rotation
    #[must_use]
    pub fn rotated(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set visual
    #[must_use]
    pub fn with_visual(mut self, geometry: Geometry, appearance: Appearance) -> Self {
        self.visual = Some(VisualDesc { geometry, appearance });
        self
    }

    /// Builder pattern: Set body
    #[must_use]
    pub fn with_body(mut self, body: BodyDesc) -> Self {
        self.body = Some(body);
        self
    }

    /// Builder pattern: Set spin
    #[must_use]
    pub fn with_spin(mut self, rate: [f32; 3], wrap_threshold: f32) -> Self {
        self.spin = Some(SpinDesc { rate, wrap_threshold });
        self
    }

    /// Builder pattern: Keep visual and body independent
    #[must_use]
    pub fn unbound(mut self) -> Self {
        self.bind = false;
        self
    }

    /// Initial transform
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(
            Vec3::from(self.position),
            quat_from_euler(Vec3::from(self.rotation)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyKind, BodyShape};

    #[test]
    fn test_defaults_from_ron() {
        let desc: ObjectDesc = ron::from_str(
            r#"(
                name: "ball",
                position: (0.0, 20.0, 0.0),
                body: Some((shape: Sphere(radius: 10.0), kind: Dynamic)),
            )"#,
        )
        .unwrap();

        assert!(desc.bind);
        assert!(desc.visual.is_none());
        let body = desc.body.unwrap();
        assert_eq!(body.shape, BodyShape::Sphere { radius: 10.0 });
        assert_eq!(body.kind, BodyKind::Dynamic);
        assert_eq!(body.material.friction, 0.2);
    }

    #[test]
    fn test_spin_threshold_defaults_to_literal_360() {
        let spin: SpinDesc = ron::from_str("(rate: (0.01, 0.01, 0.0))").unwrap();
        assert_eq!(spin.wrap_threshold, 360.0);
    }
}
