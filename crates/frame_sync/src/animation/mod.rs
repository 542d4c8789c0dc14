//! Non-physics animation
//!
//! Two kinds of motion that do not come from the rigid-body world:
//! constant-rate [`Spin`] applied once per tick, and keyframe clips played by
//! the [`AnimationMixer`] on elapsed time.

mod clip;
mod mixer;
mod spin;

pub use clip::{AnimationClip, Track, TrackProperty};
pub use mixer::{ActionId, AnimationMixer};
pub use spin::Spin;
