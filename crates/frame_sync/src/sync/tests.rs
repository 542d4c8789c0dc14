//! Frame loop scenarios

use super::*;
use crate::animation::{AnimationMixer, Spin};
use crate::foundation::collections::{BodyId, BodyMap};
use crate::foundation::math::{Axis, Quat, Vec3};
use crate::input::{InputControl, InputManager, KeyBinding, KeyCode};
use crate::physics::{
    BodyDesc, BodyKind, BodyMaterial, BodyShape, PhysicsEngine, PhysicsError, RapierWorld, StepPolicy, WorldConfig,
};
use crate::render::HeadlessRenderer;
use crate::scene::{Appearance, Camera, Geometry, SceneGraph, SceneObject};
use approx::assert_relative_eq;

/// Moves every body down one unit and spins it a little per advance
#[derive(Default)]
struct CountingPhysics {
    bodies: BodyMap<(String, Vec3, Quat)>,
    advances: u32,
    translations: u32,
}

impl PhysicsEngine for CountingPhysics {
    fn add_body(
        &mut self,
        name: &str,
        _desc: &BodyDesc,
        position: Vec3,
        rotation: Quat,
    ) -> Result<BodyId, PhysicsError> {
        Ok(self.bodies.insert((name.to_string(), position, rotation)))
    }

    fn advance(&mut self) {
        self.advances += 1;
        for (_, (_, position, rotation)) in &mut self.bodies {
            position.y -= 1.0;
            *rotation = Quat::from_euler_angles(0.0, 0.1, 0.0) * *rotation;
        }
    }

    fn timestep(&self) -> f32 {
        1.0 / 60.0
    }

    fn position(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(body).map(|(_, p, _)| *p)
    }

    fn orientation(&self, body: BodyId) -> Option<Quat> {
        self.bodies.get(body).map(|(_, _, r)| *r)
    }

    fn translate(&mut self, body: BodyId, delta: Vec3) -> Result<(), PhysicsError> {
        self.translations += 1;
        let (_, position, _) = self.bodies.get_mut(body).ok_or(PhysicsError::UnknownBody(body))?;
        *position += delta;
        Ok(())
    }

    fn body_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().find(|(_, (n, _, _))| n == name).map(|(id, _)| id)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

struct Harness<P> {
    physics: P,
    scene: SceneGraph,
    input: InputManager,
    mixer: AnimationMixer,
    renderer: HeadlessRenderer,
    camera: Camera,
    sync: FrameSynchronizer,
}

impl<P: PhysicsEngine> Harness<P> {
    fn new(physics: P, policy: StepPolicy) -> Self {
        let timestep = physics.timestep();
        Self {
            physics,
            scene: SceneGraph::new(),
            input: InputManager::new(),
            mixer: AnimationMixer::new(),
            renderer: HeadlessRenderer::new(),
            camera: Camera::default(),
            sync: FrameSynchronizer::new(timestep, policy),
        }
    }

    fn bound_ball(&mut self, name: &str, desc: &BodyDesc, position: Vec3) -> (BodyId, ObjectId) {
        let body = self.physics.add_body(name, desc, position, Quat::identity()).unwrap();
        let object = self.scene.insert(ball(name));
        self.sync.bind(body, object).unwrap();
        (body, object)
    }

    fn tick(&mut self, elapsed: f32) {
        self.sync.tick(
            elapsed,
            FrameContext {
                physics: &mut self.physics,
                scene: &mut self.scene,
                input: &mut self.input,
                mixer: &mut self.mixer,
                renderer: &mut self.renderer,
                camera: &self.camera,
            },
        );
    }
}

fn ball(name: &str) -> SceneObject {
    SceneObject::new(
        name,
        Geometry::Sphere {
            radius: 1.0,
            segments: 8,
        },
        Appearance::default(),
    )
}

fn sphere_desc() -> BodyDesc {
    BodyDesc::new(BodyShape::Sphere { radius: 1.0 }, BodyKind::Dynamic)
}

#[test]
fn test_bound_object_matches_body_exactly() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::PerFrame);
    let (body, object) = h.bound_ball("ball", &sphere_desc(), Vec3::new(0.0, 20.0, 0.0));

    for _ in 0..5 {
        h.tick(1.0 / 60.0);
        let transform = &h.scene.get(object).unwrap().transform;
        assert_eq!(Some(transform.position), h.physics.position(body));
        assert_eq!(Some(transform.rotation), h.physics.orientation(body));
    }
    assert_eq!(h.sync.stats().bindings_synced, 1);
}

#[test]
fn test_zero_elapsed_per_frame_still_advances_once() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::PerFrame);
    let (_, object) = h.bound_ball("ball", &sphere_desc(), Vec3::new(0.0, 20.0, 0.0));

    h.tick(0.0);

    assert_eq!(h.physics.advances, 1);
    assert_eq!(h.sync.stats().steps_taken, 1);
    assert_eq!(h.scene.get(object).unwrap().transform.position.y, 19.0);
}

#[test]
fn test_accumulated_policy_follows_elapsed_time() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::Accumulated { max_substeps: 8 });

    h.tick(0.0);
    assert_eq!(h.physics.advances, 0);

    h.tick(3.5 / 60.0);
    assert_eq!(h.physics.advances, 3);

    h.tick(10.0);
    assert_eq!(h.physics.advances, 11);
    assert_eq!(h.sync.stats().total_steps, 11);
}

#[test]
fn test_spin_accumulates_and_is_rendered() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::PerFrame);
    let rate = Vec3::new(0.01, 0.01, 0.0);
    let id = h
        .scene
        .insert(ball("sphere2").with_spin(Spin::new(rate, Spin::DEFAULT_WRAP_THRESHOLD)));

    for _ in 0..50 {
        h.tick(1.0 / 60.0);
    }

    let object = h.scene.get(id).unwrap();
    let spin = object.spin.as_ref().unwrap();
    assert_relative_eq!(spin.angles(), rate * 50.0, epsilon = 1e-4);
    assert_eq!(object.transform.rotation, Quat::identity());
    assert_relative_eq!(object.render_transform().rotation, spin.rotation());
}

#[test]
fn test_spin_wrap_resets_in_the_crossing_tick() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::PerFrame);
    let id = h
        .scene
        .insert(ball("spinner").with_spin(Spin::new(Vec3::new(0.4, 0.1, 0.0), 1.0)));

    h.tick(0.0);
    h.tick(0.0);
    assert_eq!(h.sync.stats().spins_wrapped, 0);
    h.tick(0.0);

    assert_eq!(h.sync.stats().spins_wrapped, 1);
    assert_eq!(h.scene.get(id).unwrap().spin.as_ref().unwrap().angles(), Vec3::zeros());
}

#[test]
fn test_key_translates_one_axis_without_stepping() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::Accumulated { max_substeps: 8 });
    let (body, object) = h.bound_ball("ball", &sphere_desc(), Vec3::new(0.0, 20.0, 0.0));
    h.sync.set_control(body, InputControl::arrows("ball"));

    h.input.handle_key_input(KeyCode::Right, true);
    h.tick(0.0);

    assert_eq!(h.physics.advances, 0);
    assert_eq!(h.physics.position(body), Some(Vec3::new(1.0, 20.0, 0.0)));
    assert_eq!(h.scene.get(object).unwrap().transform.position, Vec3::new(1.0, 20.0, 0.0));
}

#[test]
fn test_pressed_binding_fires_once_per_press() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::Accumulated { max_substeps: 8 });
    let (body, _) = h.bound_ball("ball", &sphere_desc(), Vec3::zeros());
    h.sync.set_control(
        body,
        InputControl {
            body: "ball".to_string(),
            bindings: vec![KeyBinding::pressed(KeyCode::Space, Axis::Y, 10.0)],
        },
    );

    h.input.handle_key_input(KeyCode::Space, true);
    h.tick(0.0);
    h.tick(0.0);

    assert_eq!(h.physics.translations, 1);
    assert_eq!(h.physics.position(body), Some(Vec3::new(0.0, 10.0, 0.0)));
}

#[test]
fn test_missing_body_is_skipped_and_counted() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::PerFrame);
    let (body, _) = h.bound_ball("gone", &sphere_desc(), Vec3::zeros());
    let (_, kept) = h.bound_ball("kept", &sphere_desc(), Vec3::new(0.0, 5.0, 0.0));
    h.physics.bodies.remove(body);

    h.tick(0.0);

    let stats = h.sync.stats();
    assert_eq!(stats.bindings_skipped, 1);
    assert_eq!(stats.bindings_synced, 1);
    assert_eq!(h.scene.get(kept).unwrap().transform.position.y, 4.0);
    assert_eq!(stats.frames_rendered, 1);
}

#[test]
fn test_render_failure_does_not_stop_the_tick() {
    let mut h = Harness::new(CountingPhysics::default(), StepPolicy::PerFrame);
    let (_, object) = h.bound_ball("ball", &sphere_desc(), Vec3::new(0.0, 20.0, 0.0));
    h.camera.target = h.camera.position;

    h.tick(0.0);

    assert_eq!(h.sync.stats().frames_rendered, 0);
    assert_eq!(h.scene.get(object).unwrap().transform.position.y, 19.0);
}

#[test]
fn test_box_settles_on_ground() {
    let mut h = Harness::new(RapierWorld::new(&WorldConfig::default()), StepPolicy::PerFrame);
    let ground = BodyDesc::new(BodyShape::Box { size: [1000.0, 1.0, 1000.0] }, BodyKind::Static)
        .with_material(BodyMaterial {
            density: 1.0,
            friction: 0.9,
            restitution: 0.1,
        });
    h.physics
        .add_body("ground", &ground, Vec3::new(0.0, -0.1, 0.0), Quat::identity())
        .unwrap();
    let crate_desc = BodyDesc::new(BodyShape::Box { size: [2.0, 2.0, 2.0] }, BodyKind::Dynamic);
    let (body, object) = h.bound_ball("box", &crate_desc, Vec3::new(0.0, 20.0, 0.0));

    for _ in 0..600 {
        h.tick(1.0 / 60.0);
    }

    // Ground top is at 0.4, the box half-extent is 1.
    let y = h.physics.position(body).unwrap().y;
    assert!((y - 1.4).abs() < 0.05, "box rests at y = {y}");
    assert_eq!(h.scene.get(object).unwrap().transform.position.y, y);
}
