//! Rendering abstraction
//!
//! The frame loop only needs to register drawables and ask for a frame. How a
//! backend turns a [`SceneGraph`] into pixels is its own business.

mod headless;

pub use headless::HeadlessRenderer;

use crate::foundation::collections::ObjectId;
use crate::scene::{Camera, SceneGraph, SceneObject, Viewport};
use thiserror::Error;

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Objects drawn this frame
    pub drawn: usize,
}

/// Rendering backend trait
pub trait Renderer {
    /// Register GPU-side resources for a scene object
    fn create_drawable(&mut self, id: ObjectId, object: &SceneObject) -> RenderResult<()>;

    /// Release the resources of a scene object
    fn remove_drawable(&mut self, id: ObjectId);

    /// Change the output size
    fn resize(&mut self, viewport: Viewport);

    /// Draw every visible object of the scene as seen from `camera`
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> RenderResult<FrameInfo>;
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Resource creation failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A rendering operation failed
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}
