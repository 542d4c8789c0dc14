//! Physics module
//!
//! The synchronizer talks to the simulation only through [`PhysicsEngine`].
//! [`RapierWorld`] is the bundled implementation on top of rapier3d.

pub mod body;
pub mod collision_layers;
pub mod rapier_world;
pub mod world;

pub use body::{BodyDesc, BodyKind, BodyMaterial, BodyShape};
pub use collision_layers::CollisionLayers;
pub use rapier_world::RapierWorld;
pub use world::{Broadphase, StepPolicy, WorldConfig};

use crate::foundation::collections::BodyId;
use crate::foundation::math::{Quat, Vec3};
use thiserror::Error;

/// Rigid-body simulation as seen by the frame loop
pub trait PhysicsEngine {
    /// Create a body at the given pose
    fn add_body(
        &mut self,
        name: &str,
        desc: &BodyDesc,
        position: Vec3,
        rotation: Quat,
    ) -> Result<BodyId, PhysicsError>;

    /// Advance the simulation by one fixed timestep
    fn advance(&mut self);

    /// Length of one fixed step in seconds
    fn timestep(&self) -> f32;

    /// Current position of a body
    fn position(&self, body: BodyId) -> Option<Vec3>;

    /// Current orientation of a body
    fn orientation(&self, body: BodyId) -> Option<Quat>;

    /// Move a body directly, bypassing forces and collision response
    fn translate(&mut self, body: BodyId, delta: Vec3) -> Result<(), PhysicsError>;

    /// Look a body up by the name it was created with
    fn body_by_name(&self, name: &str) -> Option<BodyId>;

    /// Number of live bodies
    fn body_count(&self) -> usize;
}

/// Physics errors
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Handle does not refer to a live body
    #[error("Unknown rigid body: {0:?}")]
    UnknownBody(BodyId),

    /// Descriptor cannot be simulated
    #[error("Invalid body '{name}': {reason}")]
    InvalidBody {
        /// Body name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two bodies share a name
    #[error("Duplicate body name: {0}")]
    DuplicateName(String),
}
