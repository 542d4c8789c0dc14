//! Clip playback

use super::{AnimationClip, TrackProperty};
use crate::foundation::collections::ObjectId;
use crate::foundation::math::{quat_from_euler, Transform};
use crate::scene::SceneGraph;

/// Index of a playing clip inside an [`AnimationMixer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

#[derive(Debug)]
struct ClipAction {
    clip: AnimationClip,
    /// Resolved target per track; `None` when no node had the track's name
    targets: Vec<Option<ObjectId>>,
    /// Transform of the asset root the track values are relative to
    root: Transform,
    time: f32,
    looping: bool,
    playing: bool,
}

/// Plays animation clips onto scene objects
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<ClipAction>,
}

impl AnimationMixer {
    /// Create an empty mixer
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a looping clip
    ///
    /// Track targets are looked up by name among `candidates` only, so two
    /// loaded copies of the same asset animate independently.
    pub fn play(
        &mut self,
        clip: AnimationClip,
        scene: &SceneGraph,
        candidates: &[ObjectId],
        root: Transform,
    ) -> ActionId {
        self.start(clip, scene, candidates, root, true)
    }

    /// Start a clip that holds its last pose once it reaches the end
    pub fn play_once(
        &mut self,
        clip: AnimationClip,
        scene: &SceneGraph,
        candidates: &[ObjectId],
        root: Transform,
    ) -> ActionId {
        self.start(clip, scene, candidates, root, false)
    }

    fn start(
        &mut self,
        clip: AnimationClip,
        scene: &SceneGraph,
        candidates: &[ObjectId],
        root: Transform,
        looping: bool,
    ) -> ActionId {
        let targets = clip
            .tracks
            .iter()
            .map(|track| {
                let found = candidates
                    .iter()
                    .copied()
                    .find(|&id| scene.get(id).is_some_and(|object| object.name == track.target));
                if found.is_none() {
                    log::warn!("Clip '{}': no node named '{}'", clip.name, track.target);
                }
                found
            })
            .collect();

        log::info!(
            "Playing clip '{}' ({:.2}s{})",
            clip.name,
            clip.length(),
            if looping { ", looping" } else { "" }
        );
        self.actions.push(ClipAction {
            clip,
            targets,
            root,
            time: 0.0,
            looping,
            playing: true,
        });
        ActionId(self.actions.len() - 1)
    }

    /// Stop a clip; its targets keep their last pose
    pub fn stop(&mut self, action: ActionId) {
        if let Some(action) = self.actions.get_mut(action.0) {
            action.playing = false;
        }
    }

    /// Current playback time of a clip
    pub fn time(&self, action: ActionId) -> Option<f32> {
        self.actions.get(action.0).map(|action| action.time)
    }

    /// Whether a clip is still advancing
    pub fn is_playing(&self, action: ActionId) -> bool {
        self.actions.get(action.0).is_some_and(|action| action.playing)
    }

    /// Number of actions, playing or stopped
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Advance every playing clip by `delta` seconds and pose its targets
    ///
    /// Objects for which `is_bound` is true are left alone: their transform
    /// belongs to the physics body.
    pub fn update(&mut self, delta: f32, scene: &mut SceneGraph, is_bound: impl Fn(ObjectId) -> bool) {
        if delta <= 0.0 {
            return;
        }

        for action in self.actions.iter_mut().filter(|action| action.playing) {
            let length = action.clip.length();
            action.time += delta;
            if length > 0.0 && action.time > length {
                if action.looping {
                    action.time %= length;
                } else {
                    action.time = length;
                    action.playing = false;
                }
            }

            for (track, target) in action.clip.tracks.iter().zip(&action.targets) {
                let Some(id) = *target else { continue };
                if is_bound(id) {
                    continue;
                }
                let (Some(object), Some(value)) = (scene.get_mut(id), track.sample(action.time)) else {
                    continue;
                };

                let root = &action.root;
                match track.property {
                    TrackProperty::Position => {
                        object.transform.position = root.position + root.rotation * root.scale.component_mul(&value);
                    }
                    TrackProperty::Rotation => {
                        object.transform.rotation = root.rotation * quat_from_euler(value);
                    }
                    TrackProperty::Scale => {
                        object.transform.scale = root.scale.component_mul(&value);
                    }
                }
            }
        }
    }
}
