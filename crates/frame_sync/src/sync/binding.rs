//! Body to scene-object bindings

use std::collections::HashSet;

use super::SyncError;
use crate::foundation::collections::{BodyId, ObjectId};

/// A scene object whose transform is copied from a rigid body every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyMeshBinding {
    /// Source of truth
    pub body: BodyId,
    /// Follower
    pub object: ObjectId,
}

/// One-to-one set of bindings
///
/// A body drives at most one object and an object follows at most one body.
/// Bindings are never reassigned once made.
#[derive(Debug, Default)]
pub struct BindingSet {
    bindings: Vec<BodyMeshBinding>,
    bodies: HashSet<BodyId>,
    objects: HashSet<ObjectId>,
}

impl BindingSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `object` to follow `body`
    pub fn bind(&mut self, body: BodyId, object: ObjectId) -> Result<BodyMeshBinding, SyncError> {
        if self.bodies.contains(&body) {
            return Err(SyncError::BodyAlreadyBound(body));
        }
        if self.objects.contains(&object) {
            return Err(SyncError::ObjectAlreadyBound(object));
        }

        let binding = BodyMeshBinding { body, object };
        self.bodies.insert(body);
        self.objects.insert(object);
        self.bindings.push(binding);
        Ok(binding)
    }

    /// Whether an object follows a body
    pub fn is_object_bound(&self, object: ObjectId) -> bool {
        self.objects.contains(&object)
    }

    /// Body driving an object
    pub fn body_of(&self, object: ObjectId) -> Option<BodyId> {
        self.bindings
            .iter()
            .find(|binding| binding.object == object)
            .map(|binding| binding.body)
    }

    /// Iterate in creation order
    pub fn iter(&self) -> impl Iterator<Item = &BodyMeshBinding> {
        self.bindings.iter()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
