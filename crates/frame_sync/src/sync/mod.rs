//! Render-physics synchronization
//!
//! [`FrameSynchronizer::tick`] is the whole frame: it steps the physics
//! world, applies keyboard translation, copies each bound body's pose onto
//! its scene object, advances procedural spin and animation clips, then
//! renders.
//!
//! After a tick, every bound object's position and rotation are exactly the
//! values the physics engine reports for its body.

mod binding;
mod stepper;
mod synchronizer;

#[cfg(test)]
mod tests;

pub use binding::{BindingSet, BodyMeshBinding};
pub use stepper::FixedStepper;
pub use synchronizer::{FrameContext, FrameStats, FrameSynchronizer};

use crate::foundation::collections::{BodyId, ObjectId};
use thiserror::Error;

/// Binding errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// Body already drives another object
    #[error("Body {0:?} is already bound")]
    BodyAlreadyBound(BodyId),

    /// Object already follows another body
    #[error("Object {0:?} is already bound")]
    ObjectAlreadyBound(ObjectId),
}
