//! Asset loading
//!
//! Assets are read and parsed on a worker thread. Results come back as
//! [`AssetEvent`]s on a channel that the session drains between frames, so a
//! slow or failing load never stalls the frame loop.
//!
//! Two formats are understood, picked by extension:
//! - `.ron`: an [`AssetDocument`] with a node subgraph and animation clips
//! - `.obj`: a single static triangle mesh

mod obj_loader;

pub use obj_loader::{ObjError, ObjLoader};

use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::AnimationClip;
use crate::foundation::math::{quat_from_euler, Transform, Vec3};
use crate::scene::{Appearance, Geometry, SceneObject, VisualDesc};

const CHUNK_SIZE: usize = 64 * 1024;

/// What to load and how to place it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRequest {
    /// File to load
    pub path: PathBuf,
    /// Root position of the loaded subgraph
    #[serde(default)]
    pub position: [f32; 3],
    /// Uniform scale applied to the whole subgraph
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Index of the clip to play, if the asset has any
    #[serde(default)]
    pub clip: usize,
    /// Repeat the clip; when false it plays once and holds its last pose
    #[serde(default = "default_looping")]
    pub looping: bool,
}

const fn default_scale() -> f32 {
    1.0
}

const fn default_looping() -> bool {
    true
}

impl AssetRequest {
    /// Request with unit scale at the origin playing the first clip
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            position: [0.0; 3],
            scale: default_scale(),
            clip: 0,
            looping: default_looping(),
        }
    }

    /// Builder pattern: Set uniform scale
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set clip index
    #[must_use]
    pub fn with_clip(mut self, clip: usize) -> Self {
        self.clip = clip;
        self
    }

    /// Builder pattern: Play the clip once instead of looping
    #[must_use]
    pub fn play_once(mut self) -> Self {
        self.looping = false;
        self
    }

    /// Transform of the subgraph root
    pub fn root_transform(&self) -> Transform {
        Transform {
            position: Vec3::from(self.position),
            ..Transform::default()
        }
        .with_uniform_scale(self.scale)
    }
}

/// One node of an asset document, in asset-local space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetNode {
    /// Node name, targeted by clip tracks
    pub name: String,
    /// Local position
    #[serde(default)]
    pub position: [f32; 3],
    /// Local XYZ Euler rotation in radians
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Local scale
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Drawable
    pub visual: VisualDesc,
}

const fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

impl AssetNode {
    fn local_transform(&self) -> Transform {
        Transform {
            position: Vec3::from(self.position),
            rotation: quat_from_euler(Vec3::from(self.rotation)),
            scale: Vec3::from(self.scale),
        }
    }
}

/// Contents of a `.ron` asset file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetDocument {
    /// Nodes of the subgraph
    pub nodes: Vec<AssetNode>,
    /// Animation clips targeting nodes by name
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
}

/// A parsed asset ready to be spliced into a scene
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    /// Originating request
    pub request: AssetRequest,
    /// Scene objects with the request's root transform already applied
    pub objects: Vec<SceneObject>,
    /// Animation clips shipped with the asset
    pub clips: Vec<AnimationClip>,
}

impl LoadedAsset {
    /// Clip selected by the request, if present
    pub fn selected_clip(&self) -> Option<&AnimationClip> {
        self.clips.get(self.request.clip)
    }
}

/// Progress and completion notifications from the loader
#[derive(Debug)]
pub enum AssetEvent {
    /// Bytes read so far
    Progress {
        /// Asset being read
        path: PathBuf,
        /// Bytes read
        loaded: u64,
        /// File size in bytes
        total: u64,
    },
    /// Asset parsed successfully
    Loaded(LoadedAsset),
    /// Asset could not be loaded; no retry is attempted
    Failed(AssetError),
}

impl AssetEvent {
    /// Percentage for a progress event
    pub fn percent(&self) -> Option<f32> {
        match self {
            Self::Progress { loaded, total, .. } if *total > 0 => {
                Some(*loaded as f32 / *total as f32 * 100.0)
            }
            Self::Progress { .. } => Some(100.0),
            _ => None,
        }
    }
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Asset path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Asset document could not be parsed
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Asset path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// OBJ mesh could not be parsed
    #[error("Failed to load mesh {path}: {source}")]
    Obj {
        /// Asset path
        path: PathBuf,
        /// Underlying error
        source: ObjError,
    },

    /// Extension is neither `.ron` nor `.obj`
    #[error("Unsupported asset format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Worker thread could not be started
    #[error("Failed to spawn loader thread: {0}")]
    Spawn(std::io::Error),
}

/// Background asset loader
#[derive(Debug)]
pub struct AssetLoader {
    sender: Sender<AssetEvent>,
    receiver: Receiver<AssetEvent>,
    in_flight: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    /// Create an idle loader
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Start loading an asset on a worker thread
    pub fn load(&mut self, request: AssetRequest) -> Result<(), AssetError> {
        let sender = self.sender.clone();
        let name = format!("asset-loader:{}", request.path.display());
        log::info!("Loading asset {}", request.path.display());

        thread::Builder::new()
            .name(name)
            .spawn(move || {
                let event = match load_blocking(&request, &sender) {
                    Ok(asset) => AssetEvent::Loaded(asset),
                    Err(error) => AssetEvent::Failed(error),
                };
                // Receiver gone means the session ended; nothing to report to.
                let _ = sender.send(event);
            })
            .map_err(AssetError::Spawn)?;

        self.in_flight += 1;
        Ok(())
    }

    /// Events received since the last call, without blocking
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let events: Vec<_> = self.receiver.try_iter().collect();
        let finished = events
            .iter()
            .filter(|event| matches!(event, AssetEvent::Loaded(_) | AssetEvent::Failed(_)))
            .count();
        self.in_flight = self.in_flight.saturating_sub(finished);
        events
    }

    /// Loads started but not yet finished
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Load an asset on the calling thread, reporting progress on `progress`
pub fn load_blocking(
    request: &AssetRequest,
    progress: &Sender<AssetEvent>,
) -> Result<LoadedAsset, AssetError> {
    let path = &request.path;
    let bytes = read_with_progress(path, progress)?;

    let (objects, clips) = match extension(path) {
        Some("ron") => {
            let text = String::from_utf8(bytes).map_err(|e| AssetError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let document: AssetDocument = ron::from_str(&text).map_err(|e| AssetError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            document_objects(path, document)?
        }
        Some("obj") => {
            let mesh = ObjLoader::parse(bytes.as_slice()).map_err(|source| AssetError::Obj {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_stem()
                .map_or_else(|| "mesh".to_string(), |s| s.to_string_lossy().into_owned());
            let object = SceneObject::new(name, Geometry::Mesh(mesh), Appearance::default());
            (vec![object], Vec::new())
        }
        _ => return Err(AssetError::UnsupportedFormat(path.clone())),
    };

    let root = request.root_transform();
    let objects = objects
        .into_iter()
        .map(|mut object| {
            object.transform = compose(&root, &object.transform);
            object
        })
        .collect();

    Ok(LoadedAsset {
        request: request.clone(),
        objects,
        clips,
    })
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn read_with_progress(path: &Path, progress: &Sender<AssetEvent>) -> Result<Vec<u8>, AssetError> {
    let io_error = |source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_error)?;
    let total = file.metadata().map_err(io_error)?.len();
    let mut reader = BufReader::new(file);

    let mut bytes = Vec::new();
    let mut chunk = vec![0; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut chunk).map_err(io_error)?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
        if (bytes.len() as u64) < total {
            let _ = progress.send(AssetEvent::Progress {
                path: path.to_path_buf(),
                loaded: bytes.len() as u64,
                total,
            });
        }
    }

    let _ = progress.send(AssetEvent::Progress {
        path: path.to_path_buf(),
        loaded: bytes.len() as u64,
        total: total.max(bytes.len() as u64),
    });
    Ok(bytes)
}

fn document_objects(
    path: &Path,
    document: AssetDocument,
) -> Result<(Vec<SceneObject>, Vec<AnimationClip>), AssetError> {
    for clip in &document.clips {
        clip.validate().map_err(|message| AssetError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
    }

    let objects = document
        .nodes
        .into_iter()
        .map(|node| {
            let transform = node.local_transform();
            SceneObject::new(node.name, node.visual.geometry, node.visual.appearance)
                .with_transform(transform)
        })
        .collect();
    Ok((objects, document.clips))
}

/// `parent * child` for TRS transforms without shear
fn compose(parent: &Transform, child: &Transform) -> Transform {
    Transform {
        position: parent.position + parent.rotation * parent.scale.component_mul(&child.position),
        rotation: parent.rotation * child.rotation,
        scale: parent.scale.component_mul(&child.scale),
    }
}
