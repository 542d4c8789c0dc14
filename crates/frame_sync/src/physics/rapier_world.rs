//! rapier3d-backed physics world
//!
//! Owns every rapier structure needed to step a scene of rigid bodies. Bodies
//! are addressed from the outside by [`BodyId`] so callers never hold rapier
//! handles directly.

use std::collections::HashMap;

use nalgebra::{Isometry3, Translation3};
use rapier3d::prelude::{
    BroadPhaseBvh, CCDSolver, ColliderBuilder, ColliderSet, Group, ImpulseJointSet,
    IntegrationParameters, InteractionGroups, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};

use super::{BodyDesc, BodyKind, BodyShape, Broadphase, PhysicsEngine, PhysicsError, WorldConfig};
use crate::foundation::collections::{BodyId, BodyMap};
use crate::foundation::math::{Quat, Vec3};

struct BodyEntry {
    name: String,
    handle: RigidBodyHandle,
}

/// Physics world on top of rapier3d
pub struct RapierWorld {
    gravity: Vec3,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    entries: BodyMap<BodyEntry>,
    names: HashMap<String, BodyId>,
    steps: u64,
}

impl RapierWorld {
    /// Create an empty world from configuration
    pub fn new(config: &WorldConfig) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: config.timestep,
            num_solver_iterations: config.iterations as usize,
            ..IntegrationParameters::default()
        };

        if config.broadphase != Broadphase::BoundingVolumeTree {
            log::debug!(
                "Requested {:?} broad-phase; rapier3d always prunes with its BVH",
                config.broadphase
            );
        }

        log::info!(
            "Physics world: gravity {:?}, dt {:.4}s, {} solver iterations",
            config.gravity,
            config.timestep,
            config.iterations
        );

        Self {
            gravity: config.gravity(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            entries: BodyMap::with_key(),
            names: HashMap::new(),
            steps: 0,
        }
    }

    /// Number of fixed steps taken so far
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    fn handle(&self, body: BodyId) -> Option<RigidBodyHandle> {
        self.entries.get(body).map(|entry| entry.handle)
    }
}

impl PhysicsEngine for RapierWorld {
    fn add_body(
        &mut self,
        name: &str,
        desc: &BodyDesc,
        position: Vec3,
        rotation: Quat,
    ) -> Result<BodyId, PhysicsError> {
        desc.validate(name)?;
        if self.names.contains_key(name) {
            return Err(PhysicsError::DuplicateName(name.to_string()));
        }

        let pose = Isometry3::from_parts(Translation3::from(position), rotation);
        let builder = match desc.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let handle = self.bodies.insert(builder.pose(pose).build());

        let collider = match &desc.shape {
            BodyShape::Box { size } => ColliderBuilder::cuboid(size[0] * 0.5, size[1] * 0.5, size[2] * 0.5),
            BodyShape::Sphere { radius } => ColliderBuilder::ball(*radius),
        };
        let groups = InteractionGroups::all()
            .with_memberships(Group::from_bits_truncate(desc.belongs_to))
            .with_filter(Group::from_bits_truncate(desc.collides_with));
        let collider = collider
            .density(desc.material.density)
            .friction(desc.material.friction)
            .restitution(desc.material.restitution)
            .collision_groups(groups)
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        let id = self.entries.insert(BodyEntry {
            name: name.to_string(),
            handle,
        });
        self.names.insert(name.to_string(), id);

        log::debug!("Added {:?} body '{}' at {:?}", desc.kind, name, position);
        Ok(id)
    }

    fn advance(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.steps += 1;
    }

    fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    fn position(&self, body: BodyId) -> Option<Vec3> {
        let handle = self.handle(body)?;
        self.bodies.get(handle).map(|rb| *rb.translation())
    }

    fn orientation(&self, body: BodyId) -> Option<Quat> {
        let handle = self.handle(body)?;
        self.bodies.get(handle).map(|rb| *rb.rotation())
    }

    fn translate(&mut self, body: BodyId, delta: Vec3) -> Result<(), PhysicsError> {
        let rb = self
            .handle(body)
            .and_then(|handle| self.bodies.get_mut(handle))
            .ok_or(PhysicsError::UnknownBody(body))?;
        let target = *rb.translation() + delta;
        rb.set_translation(target, true);
        Ok(())
    }

    fn body_by_name(&self, name: &str) -> Option<BodyId> {
        self.names.get(name).copied()
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for RapierWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapierWorld")
            .field("bodies", &self.entries.values().map(|e| e.name.as_str()).collect::<Vec<_>>())
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}
