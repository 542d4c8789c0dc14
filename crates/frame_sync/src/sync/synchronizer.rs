//! The per-frame tick

use super::{BindingSet, BodyMeshBinding, FixedStepper, SyncError};
use crate::animation::AnimationMixer;
use crate::foundation::collections::{BodyId, ObjectId};
use crate::foundation::math::Vec3;
use crate::input::{InputControl, InputManager};
use crate::physics::{PhysicsEngine, StepPolicy};
use crate::render::Renderer;
use crate::scene::{Camera, SceneGraph};

/// Everything a tick touches, borrowed from the owner for its duration
pub struct FrameContext<'a> {
    /// Rigid-body world
    pub physics: &'a mut dyn PhysicsEngine,
    /// Scene objects
    pub scene: &'a mut SceneGraph,
    /// Keyboard state
    pub input: &'a mut InputManager,
    /// Clip playback
    pub mixer: &'a mut AnimationMixer,
    /// Output
    pub renderer: &'a mut dyn Renderer,
    /// Viewpoint
    pub camera: &'a Camera,
}

/// Counters for the most recent tick plus running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Ticks run so far
    pub frame: u64,
    /// Physics steps taken by the last tick
    pub steps_taken: u32,
    /// Bindings copied by the last tick
    pub bindings_synced: usize,
    /// Bindings skipped by the last tick for a missing body or object
    pub bindings_skipped: usize,
    /// Spinning objects that wrapped in the last tick
    pub spins_wrapped: usize,
    /// Ticks whose render call succeeded
    pub frames_rendered: u64,
    /// Physics steps taken over the whole run
    pub total_steps: u64,
}

/// Drives physics, bindings, spin, clips and rendering once per frame
#[derive(Debug)]
pub struct FrameSynchronizer {
    bindings: BindingSet,
    stepper: FixedStepper,
    control: Option<(BodyId, InputControl)>,
    stats: FrameStats,
}

impl FrameSynchronizer {
    /// Create a synchronizer stepping at `timestep` under `policy`
    pub fn new(timestep: f32, policy: StepPolicy) -> Self {
        Self {
            bindings: BindingSet::new(),
            stepper: FixedStepper::new(timestep, policy),
            control: None,
            stats: FrameStats::default(),
        }
    }

    /// Make `object` follow `body`
    pub fn bind(&mut self, body: BodyId, object: ObjectId) -> Result<BodyMeshBinding, SyncError> {
        self.bindings.bind(body, object)
    }

    /// Let the keyboard translate `body`
    pub fn set_control(&mut self, body: BodyId, control: InputControl) {
        log::debug!("Keyboard controls body '{}'", control.body);
        self.control = Some((body, control));
    }

    /// Current bindings
    pub const fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// Counters from the last tick
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Run one frame
    ///
    /// Order: physics steps, keyboard translation, body to object copy, spin,
    /// clips, render. Translation lands before the copy so the moved body
    /// shows up in the same frame. Render errors are logged and dropped.
    pub fn tick(&mut self, elapsed: f32, ctx: FrameContext<'_>) {
        let elapsed = super::stepper::sanitize(elapsed);
        let FrameContext {
            physics,
            scene,
            input,
            mixer,
            renderer,
            camera,
        } = ctx;

        self.stats.frame += 1;

        let steps = self.stepper.steps_for(elapsed);
        for _ in 0..steps {
            physics.advance();
        }
        self.stats.steps_taken = steps;
        self.stats.total_steps += u64::from(steps);

        self.apply_input(physics, input);
        self.sync_bindings(physics, scene);
        self.stats.spins_wrapped = advance_spins(scene);

        let bindings = &self.bindings;
        mixer.update(elapsed, scene, |id| bindings.is_object_bound(id));

        match renderer.render(scene, camera) {
            Ok(info) => {
                self.stats.frames_rendered += 1;
                log::trace!("Frame {} drew {} objects", info.frame, info.drawn);
            }
            Err(e) => log::warn!("Render failed on frame {}: {e}", self.stats.frame),
        }
    }

    fn apply_input(&self, physics: &mut dyn PhysicsEngine, input: &mut InputManager) {
        if let Some((body, control)) = &self.control {
            let delta = control.net_translation(input);
            if delta != Vec3::zeros() {
                if let Err(e) = physics.translate(*body, delta) {
                    log::warn!("Keyboard translation of '{}' failed: {e}", control.body);
                }
            }
        }
        input.end_frame();
    }

    fn sync_bindings(&mut self, physics: &dyn PhysicsEngine, scene: &mut SceneGraph) {
        let mut synced = 0;
        let mut skipped = 0;

        for binding in self.bindings.iter() {
            let pose = physics
                .position(binding.body)
                .zip(physics.orientation(binding.body));
            match (pose, scene.get_mut(binding.object)) {
                (Some((position, rotation)), Some(object)) => {
                    object.transform.position = position;
                    object.transform.rotation = rotation;
                    synced += 1;
                }
                _ => {
                    log::debug!("Skipping binding {binding:?}: body or object is gone");
                    skipped += 1;
                }
            }
        }

        self.stats.bindings_synced = synced;
        self.stats.bindings_skipped = skipped;
    }
}

fn advance_spins(scene: &mut SceneGraph) -> usize {
    let mut wrapped = 0;
    for (_, object) in scene.iter_mut() {
        if let Some(spin) = object.spin.as_mut() {
            if spin.advance() {
                log::debug!("Spin of '{}' wrapped", object.name);
                wrapped += 1;
            }
        }
    }
    wrapped
}
