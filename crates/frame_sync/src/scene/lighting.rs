//! Scene lights (configuration data, consumed by the renderer)

use serde::{Deserialize, Serialize};

/// Kind of light source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    /// Omnidirectional point light
    Point,
    /// Uniform light with no position
    Ambient,
}

/// A light in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Kind of light
    pub kind: LightKind,
    /// 0xRRGGBB colour
    #[serde(default = "white")]
    pub color: u32,
    /// Intensity multiplier
    #[serde(default = "unit")]
    pub intensity: f32,
    /// World position (ignored for ambient lights)
    #[serde(default)]
    pub position: [f32; 3],
}

const fn white() -> u32 {
    0xff_ff_ff
}

const fn unit() -> f32 {
    1.0
}

impl Light {
    /// White point light at `position`
    pub const fn point(position: [f32; 3]) -> Self {
        Self {
            kind: LightKind::Point,
            color: white(),
            intensity: unit(),
            position,
        }
    }

    /// White ambient light
    pub const fn ambient() -> Self {
        Self {
            kind: LightKind::Ambient,
            color: white(),
            intensity: unit(),
            position: [0.0; 3],
        }
    }
}
