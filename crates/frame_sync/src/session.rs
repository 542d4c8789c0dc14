//! Session: one physics world, one scene, one renderer and their frame loop
//!
//! A [`Session`] owns every piece of mutable state. It is built from a
//! [`SessionConfig`] by [`Session::setup`] and then driven by an outside
//! scheduler calling [`Session::frame`] once per display frame.

use thiserror::Error;

use crate::animation::AnimationMixer;
use crate::assets::{AssetError, AssetEvent, AssetLoader, LoadedAsset};
use crate::core::{ConfigError, SessionConfig};
use crate::foundation::collections::ObjectId;
use crate::foundation::math::Vec3;
use crate::input::InputManager;
use crate::physics::{PhysicsEngine, PhysicsError, RapierWorld};
use crate::render::{RenderError, Renderer};
use crate::scene::{Camera, ObjectDesc, SceneGraph, SceneObject};
use crate::sync::{FrameContext, FrameStats, FrameSynchronizer, SyncError};

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A body could not be created
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// A binding could not be made
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// A drawable could not be created
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// An asset load could not be started
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Input control names a body that does not exist
    #[error("Unknown body: {0}")]
    UnknownBody(String),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Owned simulation and presentation state
pub struct Session {
    physics: Box<dyn PhysicsEngine>,
    scene: SceneGraph,
    renderer: Box<dyn Renderer>,
    input: InputManager,
    mixer: AnimationMixer,
    synchronizer: FrameSynchronizer,
    loader: AssetLoader,
    camera: Camera,
    loaded_assets: usize,
    failed_assets: usize,
}

impl Session {
    /// Build a session on a rapier world
    pub fn setup(config: &SessionConfig, renderer: Box<dyn Renderer>) -> SessionResult<Self> {
        config.validate()?;
        let physics = Box::new(RapierWorld::new(&config.world));
        Self::with_physics(config, physics, renderer)
    }

    /// Build a session on any physics engine
    pub fn with_physics(
        config: &SessionConfig,
        physics: Box<dyn PhysicsEngine>,
        mut renderer: Box<dyn Renderer>,
    ) -> SessionResult<Self> {
        config.validate()?;
        log::info!("Setting up session with {} objects", config.objects.len());

        renderer.resize(config.viewport);

        let mut session = Self {
            synchronizer: FrameSynchronizer::new(physics.timestep(), config.world.step_policy),
            physics,
            scene: SceneGraph::new(),
            renderer,
            input: InputManager::new(),
            mixer: AnimationMixer::new(),
            loader: AssetLoader::new(),
            camera: config.camera.clone(),
            loaded_assets: 0,
            failed_assets: 0,
        };

        for light in &config.lights {
            session.scene.add_light(light.clone());
        }

        for desc in &config.objects {
            session.add_object(desc)?;
        }

        if let Some(control) = &config.input {
            let body = session
                .physics
                .body_by_name(&control.body)
                .ok_or_else(|| SessionError::UnknownBody(control.body.clone()))?;
            session.synchronizer.set_control(body, control.clone());
        }

        for request in &config.assets {
            session.loader.load(request.clone())?;
        }

        log::info!(
            "Session ready: {} objects, {} bodies, {} bindings",
            session.scene.len(),
            session.physics.body_count(),
            session.synchronizer.bindings().len()
        );
        Ok(session)
    }

    /// Create the visual, body and binding one descriptor asks for
    ///
    /// On error nothing is left behind: a visual created before a failing
    /// body is removed again.
    pub fn add_object(&mut self, desc: &ObjectDesc) -> SessionResult<Option<ObjectId>> {
        let transform = desc.transform();

        let object = match &desc.visual {
            Some(visual) => {
                let mut object = SceneObject::new(&desc.name, visual.geometry.clone(), visual.appearance.clone())
                    .with_transform(transform.clone());
                if let Some(spin) = &desc.spin {
                    object = object.with_spin(spin.to_spin());
                }
                Some(self.insert_object(object)?)
            }
            None => None,
        };

        let body = match &desc.body {
            Some(body) => match self.physics.add_body(&desc.name, body, transform.position, transform.rotation) {
                Ok(id) => Some(id),
                Err(e) => {
                    if let Some(object) = object {
                        self.remove_object(object);
                    }
                    return Err(e.into());
                }
            },
            None => None,
        };

        if let (true, Some(body), Some(object)) = (desc.bind, body, object) {
            self.synchronizer.bind(body, object)?;
            log::debug!("Bound '{}' to its body", desc.name);
        }
        Ok(object)
    }

    fn remove_object(&mut self, id: ObjectId) {
        self.renderer.remove_drawable(id);
        self.scene.remove(id);
    }

    fn insert_object(&mut self, object: SceneObject) -> SessionResult<ObjectId> {
        let id = self.scene.insert(object);
        if let Some(object) = self.scene.get(id) {
            if let Err(e) = self.renderer.create_drawable(id, object) {
                self.scene.remove(id);
                return Err(e.into());
            }
        }
        Ok(id)
    }

    /// Pick up finished asset loads, then run one tick
    pub fn frame(&mut self, elapsed: f32) {
        self.process_asset_events();
        self.tick(elapsed);
    }

    /// Run one tick without looking at the asset queue
    pub fn tick(&mut self, elapsed: f32) {
        self.synchronizer.tick(
            elapsed,
            FrameContext {
                physics: self.physics.as_mut(),
                scene: &mut self.scene,
                input: &mut self.input,
                mixer: &mut self.mixer,
                renderer: self.renderer.as_mut(),
                camera: &self.camera,
            },
        );
    }

    /// Run `frames` frames of `elapsed` seconds each
    pub fn run_frames(&mut self, frames: u64, elapsed: f32) {
        for _ in 0..frames {
            self.frame(elapsed);
        }
    }

    /// Drain the loader channel without blocking
    pub fn process_asset_events(&mut self) {
        for event in self.loader.poll() {
            let percent = event.percent();
            match event {
                AssetEvent::Progress { path, .. } => {
                    if let Some(percent) = percent {
                        log::info!("{}: {percent:.0}% loaded", path.display());
                    }
                }
                AssetEvent::Loaded(asset) => self.splice_asset(asset),
                AssetEvent::Failed(error) => {
                    self.failed_assets += 1;
                    log::error!("{error}");
                }
            }
        }
    }

    fn splice_asset(&mut self, asset: LoadedAsset) {
        let root = asset.request.root_transform();
        let mut ids = Vec::with_capacity(asset.objects.len());

        for object in asset.objects.iter().cloned() {
            let name = object.name.clone();
            match self.insert_object(object) {
                Ok(id) => ids.push(id),
                Err(e) => log::warn!("Skipping node '{name}' of {}: {e}", asset.request.path.display()),
            }
        }

        match asset.selected_clip() {
            Some(clip) if asset.request.looping => {
                self.mixer.play(clip.clone(), &self.scene, &ids, root);
            }
            Some(clip) => {
                self.mixer.play_once(clip.clone(), &self.scene, &ids, root);
            }
            None if !asset.clips.is_empty() => log::warn!(
                "{} has {} clips, no clip {}",
                asset.request.path.display(),
                asset.clips.len(),
                asset.request.clip
            ),
            None => {}
        }

        self.loaded_assets += 1;
        log::info!("Loaded {} ({} nodes)", asset.request.path.display(), ids.len());
    }

    /// Scene objects
    pub const fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Scene objects, mutably
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Physics world
    pub fn physics(&self) -> &dyn PhysicsEngine {
        self.physics.as_ref()
    }

    /// Keyboard state, for feeding key events
    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// Camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Clip playback
    pub const fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    /// The frame loop
    pub const fn synchronizer(&self) -> &FrameSynchronizer {
        &self.synchronizer
    }

    /// Counters from the last tick
    pub const fn stats(&self) -> FrameStats {
        self.synchronizer.stats()
    }

    /// Position of a named body
    pub fn body_position(&self, name: &str) -> Option<Vec3> {
        self.physics.body_by_name(name).and_then(|id| self.physics.position(id))
    }

    /// Asset loads still running
    pub const fn pending_assets(&self) -> usize {
        self.loader.in_flight()
    }

    /// Assets spliced into the scene so far
    pub const fn loaded_assets(&self) -> usize {
        self.loaded_assets
    }

    /// Asset loads that failed
    pub const fn failed_assets(&self) -> usize {
        self.failed_assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRequest;
    use crate::input::{InputControl, KeyCode};
    use crate::physics::{BodyDesc, BodyKind, BodyShape};
    use crate::render::HeadlessRenderer;
    use crate::scene::{Appearance, Geometry, MeshGeometry};
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn default_session() -> Session {
        Session::setup(&SessionConfig::default(), Box::new(HeadlessRenderer::new())).unwrap()
    }

    fn wait_for_assets(session: &mut Session) {
        for _ in 0..200 {
            session.process_asset_events();
            if session.pending_assets() == 0 {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("asset load did not finish");
    }

    #[test]
    fn test_default_scene_setup() {
        let session = default_session();

        assert_eq!(session.scene().len(), 3);
        assert_eq!(session.physics().body_count(), 2);
        assert_eq!(session.synchronizer().bindings().len(), 1);
        assert_eq!(session.scene().lights().len(), 2);
        assert_eq!(session.scene().visible().count(), 2);
    }

    #[test]
    fn test_hidden_sphere_follows_its_body() {
        let mut session = default_session();
        session.run_frames(30, 1.0 / 60.0);

        let sphere = session.scene().find("sphere").unwrap();
        let position = session.scene().get(sphere).unwrap().transform.position;
        assert_eq!(Some(position), session.body_position("sphere"));
        assert!(position.y < 20.0);
        assert_eq!(session.stats().frames_rendered, 30);
    }

    #[test]
    fn test_spinning_sphere_keeps_its_place() {
        let mut session = default_session();
        session.run_frames(10, 1.0 / 60.0);

        let id = session.scene().find("sphere2").unwrap();
        let object = session.scene().get(id).unwrap();
        assert_eq!(object.transform.position, Vec3::new(0.0, 40.0, 0.0));
        assert_relative_eq!(object.spin.as_ref().unwrap().angles().x, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_keyboard_moves_controlled_sphere() {
        let mut config = SessionConfig::default();
        config.input = Some(InputControl::arrows("sphere"));
        let mut session = Session::setup(&config, Box::new(HeadlessRenderer::new())).unwrap();

        session.input_mut().handle_key_input(KeyCode::Space, true);
        session.tick(0.0);

        assert_eq!(session.body_position("sphere"), Some(Vec3::new(0.0, 30.0, 0.0)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SessionConfig::default();
        config.world.timestep = -1.0;
        let result = Session::setup(&config, Box::new(HeadlessRenderer::new()));
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn test_rejected_mesh_adds_no_body() {
        let mut session = default_session();
        let bodies = session.physics().body_count();
        let objects = session.scene().len();

        let broken = MeshGeometry {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            normals: Vec::new(),
            indices: vec![0, 1, 7],
        };
        let desc = ObjectDesc::new("crate")
            .at([0.0, 5.0, 0.0])
            .with_visual(Geometry::Mesh(broken), Appearance::default())
            .with_body(BodyDesc::new(BodyShape::Box { size: [1.0, 1.0, 1.0] }, BodyKind::Dynamic));

        assert!(matches!(session.add_object(&desc), Err(SessionError::Render(_))));
        assert_eq!(session.physics().body_count(), bodies);
        assert_eq!(session.scene().len(), objects);
        assert_eq!(session.body_position("crate"), None);

        let fixed = ObjectDesc::new("crate")
            .at([0.0, 5.0, 0.0])
            .with_body(BodyDesc::new(BodyShape::Box { size: [1.0, 1.0, 1.0] }, BodyKind::Dynamic));
        assert!(session.add_object(&fixed).is_ok());
        assert_eq!(session.physics().body_count(), bodies + 1);
    }

    #[test]
    fn test_rejected_body_removes_its_visual() {
        let mut session = default_session();
        let objects = session.scene().len();

        let desc = ObjectDesc::new("sphere")
            .with_visual(Geometry::Sphere { radius: 1.0, segments: 8 }, Appearance::default())
            .with_body(BodyDesc::new(BodyShape::Sphere { radius: 1.0 }, BodyKind::Dynamic));

        assert!(matches!(
            session.add_object(&desc),
            Err(SessionError::Physics(PhysicsError::DuplicateName(_)))
        ));
        assert_eq!(session.scene().len(), objects);
        assert_eq!(session.synchronizer().bindings().len(), 1);
    }

    #[test]
    fn test_failed_asset_keeps_rendering() {
        let mut config = SessionConfig::default();
        config.assets.push(AssetRequest::new("/nonexistent/dancer.ron"));
        let mut session = Session::setup(&config, Box::new(HeadlessRenderer::new())).unwrap();

        wait_for_assets(&mut session);
        session.frame(1.0 / 60.0);

        assert_eq!(session.failed_assets(), 1);
        assert_eq!(session.loaded_assets(), 0);
        assert_eq!(session.stats().frames_rendered, 1);
    }

    fn write_asset(tag: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("frame_sync_session_{tag}_{}.ron", std::process::id()));
        std::fs::write(
            &path,
            r#"(
                nodes: [(name: "hips", visual: (geometry: Box(size: (1.0, 1.0, 1.0))))],
                clips: [(name: "dance", duration: 1.0, tracks: [
                    (target: "hips", property: Position, times: [0.0, 1.0], values: [(0.0, 0.0, 0.0), (0.0, 1.0, 0.0)]),
                ])],
            )"#,
        )
        .unwrap();
        path
    }

    fn hips_position(session: &Session) -> Vec3 {
        let hips = session.scene().find("hips").unwrap();
        session.scene().get(hips).unwrap().transform.position
    }

    #[test]
    fn test_loaded_asset_is_spliced_and_animated() {
        let path = write_asset("loop");
        let mut config = SessionConfig::default();
        config.assets.push(AssetRequest::new(&path).with_scale(10.0));
        let mut session = Session::setup(&config, Box::new(HeadlessRenderer::new())).unwrap();

        wait_for_assets(&mut session);
        session.tick(0.5);

        assert_eq!(session.loaded_assets(), 1);
        assert_eq!(session.mixer().action_count(), 1);
        assert_relative_eq!(hips_position(&session), Vec3::new(0.0, 5.0, 0.0), epsilon = 1e-5);

        session.tick(0.75);
        assert_relative_eq!(hips_position(&session), Vec3::new(0.0, 2.5, 0.0), epsilon = 1e-5);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_play_once_asset_stops_at_the_end() {
        let path = write_asset("once");
        let mut config = SessionConfig::default();
        config.assets.push(AssetRequest::new(&path).with_scale(10.0).play_once());
        let mut session = Session::setup(&config, Box::new(HeadlessRenderer::new())).unwrap();

        wait_for_assets(&mut session);
        session.tick(0.5);
        session.tick(0.75);

        assert_relative_eq!(hips_position(&session), Vec3::new(0.0, 10.0, 0.0), epsilon = 1e-5);
        std::fs::remove_file(path).ok();
    }
}
