//! Handle types for stable references into slot maps

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a scene object stored in a [`crate::scene::SceneGraph`]
    pub struct ObjectId;

    /// Handle to a rigid body owned by a [`crate::physics::PhysicsEngine`]
    pub struct BodyId;
}

/// Handle-based map keyed by object handles
pub type ObjectMap<T> = SlotMap<ObjectId, T>;

/// Handle-based map keyed by body handles
pub type BodyMap<T> = SlotMap<BodyId, T>;
