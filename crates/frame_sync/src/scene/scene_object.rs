//! Visual scene objects

use serde::{Deserialize, Serialize};

use crate::animation::Spin;
use crate::foundation::math::Transform;

/// Triangle mesh data, positions in object space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals (may be empty)
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices into `positions`
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut min, mut max), p| {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
            (min, max)
        }))
    }
}

/// Shape of a drawable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Box with full extents
    Box {
        /// Full size along X, Y and Z
        size: [f32; 3],
    },
    /// UV sphere
    Sphere {
        /// Radius
        radius: f32,
        /// Width and height segment count
        #[serde(default = "default_segments")]
        segments: u32,
    },
    /// Flat rectangle in the local XY plane
    Plane {
        /// Width along X
        width: f32,
        /// Height along Y
        height: f32,
    },
    /// Arbitrary triangle mesh
    Mesh(MeshGeometry),
}

const fn default_segments() -> u32 {
    16
}

impl Geometry {
    /// Short label for logs
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Plane { .. } => "plane",
            Self::Mesh(_) => "mesh",
        }
    }
}

/// Shading model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Unlit flat colour
    Basic,
    /// Physically based, lit
    Standard,
}

/// How a drawable looks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    /// 0xRRGGBB colour
    pub color: u32,
    /// Shading model
    pub material: MaterialKind,
    /// Casts shadows
    pub casts_shadow: bool,
    /// Receives shadows
    pub receives_shadow: bool,
    /// Drawn by the renderer
    pub visible: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: 0xff_ff_ff,
            material: MaterialKind::Basic,
            casts_shadow: false,
            receives_shadow: false,
            visible: true,
        }
    }
}

impl Appearance {
    /// Colour as normalized RGB
    pub fn rgb(&self) -> [f32; 3] {
        let channel = |shift: u32| ((self.color >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

/// One node of the scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Name (not necessarily unique)
    pub name: String,
    /// Shape
    pub geometry: Geometry,
    /// Colour and material
    pub appearance: Appearance,
    /// Authoritative transform; written by the synchronizer when bound
    pub transform: Transform,
    /// Procedural constant-rate rotation layered on top of `transform`
    pub spin: Option<Spin>,
}

impl SceneObject {
    /// Create an object with an identity transform
    pub fn new(name: impl Into<String>, geometry: Geometry, appearance: Appearance) -> Self {
        Self {
            name: name.into(),
            geometry,
            appearance,
            transform: Transform::default(),
            spin: None,
        }
    }

    /// Builder pattern: Set transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: Attach a spin
    #[must_use]
    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = Some(spin);
        self
    }

    /// Transform handed to the renderer: the authoritative one with spin applied
    pub fn render_transform(&self) -> Transform {
        match &self.spin {
            Some(spin) => Transform {
                rotation: self.transform.rotation * spin.rotation(),
                ..self.transform.clone()
            },
            None => self.transform.clone(),
        }
    }
}
