//! Renderer that draws nothing
//!
//! Keeps the same bookkeeping a GPU backend would (one drawable per object,
//! model matrices per frame) so the frame loop can run in tests and in the
//! demo binary without a window.

use std::collections::HashMap;

use super::{FrameInfo, RenderError, RenderResult, Renderer};
use crate::foundation::collections::ObjectId;
use crate::foundation::math::Mat4;
use crate::scene::{Camera, Geometry, SceneGraph, SceneObject, Viewport};

#[derive(Debug)]
struct Drawable {
    kind: &'static str,
    model: Mat4,
}

/// Windowless [`Renderer`]
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    drawables: HashMap<ObjectId, Drawable>,
    viewport: Viewport,
    frame_count: u64,
    last_drawn: usize,
}

impl HeadlessRenderer {
    /// Create a new headless renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set viewport
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Frames rendered so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Number of registered drawables
    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// Objects drawn by the last frame
    pub const fn last_drawn(&self) -> usize {
        self.last_drawn
    }

    /// Current viewport
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Model matrix submitted for an object in the last frame
    pub fn model_matrix(&self, id: ObjectId) -> Option<Mat4> {
        self.drawables.get(&id).map(|drawable| drawable.model)
    }
}

impl Renderer for HeadlessRenderer {
    fn create_drawable(&mut self, id: ObjectId, object: &SceneObject) -> RenderResult<()> {
        if let Geometry::Mesh(mesh) = &object.geometry {
            if mesh.indices.iter().any(|&i| i as usize >= mesh.positions.len()) {
                return Err(RenderError::ResourceCreationFailed(format!(
                    "mesh '{}' has indices past its {} vertices",
                    object.name,
                    mesh.positions.len()
                )));
            }
        }

        log::trace!("Drawable for '{}' ({})", object.name, object.geometry.kind_name());
        self.drawables.insert(
            id,
            Drawable {
                kind: object.geometry.kind_name(),
                model: object.render_transform().to_matrix(),
            },
        );
        Ok(())
    }

    fn remove_drawable(&mut self, id: ObjectId) {
        self.drawables.remove(&id);
    }

    fn resize(&mut self, viewport: Viewport) {
        log::debug!("Resize to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> RenderResult<FrameInfo> {
        let view_projection = camera.projection_matrix(&self.viewport) * camera.view_matrix();
        if view_projection.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::RenderingFailed(
                "camera produces a degenerate view".to_string(),
            ));
        }

        let mut drawn = 0;
        for (id, object) in scene.visible() {
            let Some(drawable) = self.drawables.get_mut(&id) else {
                continue;
            };
            drawable.model = object.render_transform().to_matrix();
            drawn += 1;
            log::trace!("Draw {} '{}'", drawable.kind, object.name);
        }

        self.frame_count += 1;
        self.last_drawn = drawn;
        Ok(FrameInfo {
            frame: self.frame_count,
            drawn,
        })
    }
}
