//! Scene management
//!
//! Visual objects, their storage, the camera and lights. Objects here are
//! what the renderer draws; rigid bodies live in [`crate::physics`] and are
//! tied to objects by [`crate::sync::BodyMeshBinding`].

mod camera;
mod descriptor;
mod lighting;
mod scene_graph;
mod scene_object;

pub use camera::{Camera, Viewport};
pub use descriptor::{ObjectDesc, SpinDesc, VisualDesc};
pub use lighting::{Light, LightKind};
pub use scene_graph::SceneGraph;
pub use scene_object::{Appearance, Geometry, MaterialKind, MeshGeometry, SceneObject};
