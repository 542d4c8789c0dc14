//! # Session Configuration
//!
//! Everything needed to build a [`crate::session::Session`]: engine settings,
//! the physics world, camera and lights, the object list, keyboard control
//! and assets to stream in. Loadable from `.toml` or `.ron` through the
//! [`Config`] trait.
//!
//! The default value is the stock demo scene: a hidden sphere body falling
//! onto a ground box, a visible floor plane, a spinning sphere, a point light
//! plus ambient light, and a camera at (15, 15, 30).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

use crate::assets::AssetRequest;
use crate::foundation::math::constants::HALF_PI;
use crate::input::InputControl;
use crate::physics::{BodyDesc, BodyKind, BodyMaterial, BodyShape, CollisionLayers, WorldConfig};
use crate::scene::{Appearance, Camera, Geometry, Light, MaterialKind, ObjectDesc, Viewport};

/// # Engine Configuration
///
/// Logging and frame pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level name (`error` to `trace`, or `off`), overridden by `RUST_LOG`
    pub log_level: String,
    /// Target FPS for frame rate limiting; `None` runs unpaced
    pub target_fps: Option<u32>,
    /// Stop after this many frames; `None` runs until told to stop
    pub frame_limit: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: Some(60),
            frame_limit: None,
        }
    }
}

impl EngineConfig {
    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set target FPS
    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Set frame limit
    #[must_use]
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }
}

/// # Session Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Engine settings
    pub engine: EngineConfig,
    /// Physics world settings
    pub world: WorldConfig,
    /// Output size
    pub viewport: Viewport,
    /// Camera placement
    pub camera: Camera,
    /// Lights
    pub lights: Vec<Light>,
    /// Scene objects and bodies
    pub objects: Vec<ObjectDesc>,
    /// Keyboard-driven body, if any
    pub input: Option<InputControl>,
    /// Assets loaded in the background after setup
    pub assets: Vec<AssetRequest>,
}

impl Config for SessionConfig {}

impl Default for SessionConfig {
    fn default() -> Self {
        let falling_sphere = ObjectDesc::new("sphere")
            .at([0.0, 20.0, 0.0])
            .with_visual(
                Geometry::Sphere {
                    radius: 10.0,
                    segments: 10,
                },
                Appearance {
                    color: 0x07_52_ff,
                    visible: false,
                    ..Appearance::default()
                },
            )
            .with_body(
                BodyDesc::new(BodyShape::Sphere { radius: 10.0 }, BodyKind::Dynamic)
                    .with_material(BodyMaterial {
                        density: 1.0,
                        friction: 0.2,
                        restitution: 0.2,
                    })
                    .with_layers(CollisionLayers::DEFAULT, CollisionLayers::EVERYTHING),
            );

        let ground = ObjectDesc::new("ground").at([0.0, -0.1, 0.0]).with_body(
            BodyDesc::new(BodyShape::Box { size: [1000.0, 1.0, 1000.0] }, BodyKind::Static).with_material(
                BodyMaterial {
                    density: 1.0,
                    friction: 0.9,
                    restitution: 0.1,
                },
            ),
        );

        let floor = ObjectDesc::new("floor").rotated([-HALF_PI, 0.0, 0.0]).with_visual(
            Geometry::Plane {
                width: 1000.0,
                height: 1000.0,
            },
            Appearance {
                color: 0xa2_a7_a9,
                receives_shadow: true,
                ..Appearance::default()
            },
        );

        let spinning_sphere = ObjectDesc::new("sphere2")
            .at([0.0, 40.0, 0.0])
            .with_visual(
                Geometry::Sphere {
                    radius: 8.0,
                    segments: 8,
                },
                Appearance {
                    color: 0xff_63_47,
                    material: MaterialKind::Standard,
                    ..Appearance::default()
                },
            )
            .with_spin([0.01, 0.01, 0.0], crate::animation::Spin::DEFAULT_WRAP_THRESHOLD);

        Self {
            engine: EngineConfig::default(),
            world: WorldConfig::default(),
            viewport: Viewport::default(),
            camera: Camera::default(),
            lights: vec![Light::point([5.0, 50.0, 5.0]), Light::ambient()],
            objects: vec![falling_sphere, ground, floor, spinning_sphere],
            input: None,
            assets: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;

        if self.engine.log_level.trim().parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!("unknown log level '{}'", self.engine.log_level)));
        }

        if self.engine.target_fps == Some(0) {
            return Err(ConfigError::Invalid("target_fps must be at least 1".to_string()));
        }

        let mut names = HashSet::new();
        for object in &self.objects {
            if !names.insert(object.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate object name '{}'", object.name)));
            }
            if object.visual.is_none() && object.body.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "object '{}' has neither a visual nor a body",
                    object.name
                )));
            }
            if let Some(spin) = &object.spin {
                if object.visual.is_none() {
                    return Err(ConfigError::Invalid(format!("object '{}' spins but has no visual", object.name)));
                }
                if spin.rate.iter().chain([&spin.wrap_threshold]).any(|v| !v.is_finite()) {
                    return Err(ConfigError::Invalid(format!("object '{}' has a non-finite spin", object.name)));
                }
            }
        }

        if let Some(control) = &self.input {
            let controls_body = self
                .objects
                .iter()
                .any(|object| object.name == control.body && object.body.is_some());
            if !controls_body {
                return Err(ConfigError::Invalid(format!(
                    "input controls unknown body '{}'",
                    control.body
                )));
            }
        }

        for asset in &self.assets {
            if !(asset.scale.is_finite() && asset.scale > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "asset {} has non-positive scale {}",
                    asset.path.display(),
                    asset.scale
                )));
            }
        }

        Ok(())
    }
}
