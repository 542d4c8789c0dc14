//! Scene graph storage
//!
//! Flat list of objects behind stable handles. There is no spatial structure;
//! scenes here hold a handful of primitives plus whatever assets get loaded.

use super::{Light, SceneObject};
use crate::foundation::collections::{ObjectId, ObjectMap};

/// All scene objects and lights
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: ObjectMap<SceneObject>,
    lights: Vec<Light>,
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its handle
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        log::trace!("Scene insert '{}' ({})", object.name, object.geometry.kind_name());
        self.objects.insert(object)
    }

    /// Remove an object, returning it if it existed
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.objects.remove(id)
    }

    /// Get an object
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Get an object mutably
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// First object with the given name
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// Iterate over all objects
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter()
    }

    /// Iterate mutably over all objects
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut SceneObject)> {
        self.objects.iter_mut()
    }

    /// Objects the renderer should draw
    pub fn visible(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().filter(|(_, object)| object.appearance.visible)
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add a light
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// All lights
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Appearance, Geometry};

    fn cube(name: &str, visible: bool) -> SceneObject {
        SceneObject::new(
            name,
            Geometry::Box { size: [1.0, 1.0, 1.0] },
            Appearance {
                visible,
                ..Appearance::default()
            },
        )
    }

    #[test]
    fn test_insert_find_remove() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(cube("a", true));
        let b = graph.insert(cube("b", true));

        assert_eq!(graph.find("b"), Some(b));
        assert_eq!(graph.len(), 2);

        assert!(graph.remove(a).is_some());
        assert!(graph.get(a).is_none());
        assert!(graph.remove(a).is_none());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_hidden_objects_are_not_visible() {
        let mut graph = SceneGraph::new();
        graph.insert(cube("shown", true));
        graph.insert(cube("hidden", false));

        let names: Vec<_> = graph.visible().map(|(_, o)| o.name.as_str()).collect();
        assert_eq!(names, vec!["shown"]);
    }
}
