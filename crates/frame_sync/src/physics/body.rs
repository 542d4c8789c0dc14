//! Rigid body descriptors

use serde::{Deserialize, Serialize};

use super::{CollisionLayers, PhysicsError};
use crate::foundation::math::Vec3;

/// Collision shape of a rigid body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Axis-aligned box given by its full extents
    Box {
        /// Full size along X, Y and Z
        size: [f32; 3],
    },
    /// Sphere given by its radius
    Sphere {
        /// Sphere radius
        radius: f32,
    },
}

impl BodyShape {
    /// Half extents of a box shape
    pub fn half_extents(&self) -> Option<Vec3> {
        match self {
            Self::Box { size } => Some(Vec3::from(*size) * 0.5),
            Self::Sphere { .. } => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        let dims: &[f32] = match self {
            Self::Box { size } => size,
            Self::Sphere { radius } => std::slice::from_ref(radius),
        };
        if dims.iter().all(|d| d.is_finite() && *d > 0.0) {
            Ok(())
        } else {
            Err(format!("shape dimensions must be positive and finite: {self:?}"))
        }
    }
}

/// Whether the simulation moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moved by the solver
    Static,
    /// Integrated under gravity and contacts
    Dynamic,
}

/// Surface and mass properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyMaterial {
    /// Mass density
    pub density: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Restitution (bounciness) coefficient
    pub restitution: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.2,
            restitution: 0.2,
        }
    }
}

/// Everything the physics engine needs to create a body, minus its pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Collision shape
    pub shape: BodyShape,
    /// Static or dynamic
    pub kind: BodyKind,
    /// Surface and mass properties
    #[serde(default)]
    pub material: BodyMaterial,
    /// Layers this body belongs to
    #[serde(default = "default_layer")]
    pub belongs_to: u32,
    /// Layers this body collides with
    #[serde(default = "default_mask")]
    pub collides_with: u32,
}

const fn default_layer() -> u32 {
    CollisionLayers::DEFAULT.bits()
}

const fn default_mask() -> u32 {
    CollisionLayers::EVERYTHING.bits()
}

impl BodyDesc {
    /// Create a descriptor with default material and layers
    pub fn new(shape: BodyShape, kind: BodyKind) -> Self {
        Self {
            shape,
            kind,
            material: BodyMaterial::default(),
            belongs_to: default_layer(),
            collides_with: default_mask(),
        }
    }

    /// Builder pattern: Set material
    #[must_use]
    pub fn with_material(mut self, material: BodyMaterial) -> Self {
        self.material = material;
        self
    }

    /// Builder pattern: Set collision layer and mask
    #[must_use]
    pub fn with_layers(mut self, belongs_to: CollisionLayers, collides_with: CollisionLayers) -> Self {
        self.belongs_to = belongs_to.bits();
        self.collides_with = collides_with.bits();
        self
    }

    /// Layer bits as flags
    pub const fn layer(&self) -> CollisionLayers {
        CollisionLayers::from_raw(self.belongs_to)
    }

    /// Mask bits as flags
    pub const fn mask(&self) -> CollisionLayers {
        CollisionLayers::from_raw(self.collides_with)
    }

    /// Reject shapes and materials the engine cannot simulate
    pub fn validate(&self, name: &str) -> Result<(), PhysicsError> {
        let invalid = |reason: String| PhysicsError::InvalidBody {
            name: name.to_string(),
            reason,
        };

        self.shape.validate().map_err(invalid)?;

        let m = &self.material;
        if self.kind == BodyKind::Dynamic && !(m.density.is_finite() && m.density > 0.0) {
            return Err(invalid(format!("dynamic body needs a positive density, got {}", m.density)));
        }
        if m.friction < 0.0 || m.restitution < 0.0 {
            return Err(invalid("friction and restitution must be non-negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_half_extents() {
        let shape = BodyShape::Box { size: [1000.0, 1.0, 1000.0] };
        assert_eq!(shape.half_extents(), Some(Vec3::new(500.0, 0.5, 500.0)));
    }

    #[test]
    fn test_rejects_zero_radius() {
        let desc = BodyDesc::new(BodyShape::Sphere { radius: 0.0 }, BodyKind::Dynamic);
        assert!(matches!(desc.validate("ball"), Err(PhysicsError::InvalidBody { .. })));
    }

    #[test]
    fn test_static_body_may_have_zero_density() {
        let desc = BodyDesc::new(BodyShape::Box { size: [1.0, 1.0, 1.0] }, BodyKind::Static)
            .with_material(BodyMaterial { density: 0.0, friction: 0.9, restitution: 0.1 });
        assert!(desc.validate("ground").is_ok());
    }

    #[test]
    fn test_default_layers_collide_with_everything() {
        let desc = BodyDesc::new(BodyShape::Sphere { radius: 1.0 }, BodyKind::Dynamic);
        assert_eq!(desc.layer(), CollisionLayers::DEFAULT);
        assert_eq!(desc.mask(), CollisionLayers::EVERYTHING);
    }
}
