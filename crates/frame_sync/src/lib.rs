//! # Frame Sync
//!
//! A render-physics synchronization loop. Scene objects are driven by a
//! rigid-body world stepped every frame, with constant-rate procedural spin,
//! keyframe clips and keyboard translation layered on top.
//!
//! ## Features
//!
//! - **Synchronizer**: one `tick` steps physics, copies body poses onto bound
//!   objects, spins, animates and renders
//! - **Fixed stepping**: one step per frame, or accumulated fixed steps
//! - **Data-driven scenes**: objects, bodies, lights and assets from `.ron`
//!   or `.toml`
//! - **Background assets**: node subgraphs and clips loaded off-thread
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use frame_sync::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::default();
//!     let mut session = Session::setup(&config, Box::new(HeadlessRenderer::new()))?;
//!     session.run_frames(600, 1.0 / 60.0);
//!     println!("{:?}", session.body_position("sphere"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod animation;
pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;
pub mod sync;

mod session;

pub use session::{Session, SessionError, SessionResult};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        animation::{AnimationClip, AnimationMixer, Spin},
        assets::{AssetEvent, AssetLoader, AssetRequest},
        core::{Config, ConfigError, EngineConfig, SessionConfig},
        foundation::{
            collections::{BodyId, ObjectId},
            math::{Axis, Quat, Transform, Vec3},
            time::Timer,
        },
        input::{InputControl, InputManager, KeyCode},
        physics::{BodyDesc, BodyKind, BodyShape, PhysicsEngine, RapierWorld, StepPolicy, WorldConfig},
        render::{HeadlessRenderer, Renderer},
        scene::{Camera, Geometry, ObjectDesc, SceneGraph, SceneObject},
        sync::{FrameContext, FrameStats, FrameSynchronizer},
        Session, SessionError,
    };
}
