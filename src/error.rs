//! Error taxonomy of the scene pipeline.
//!
//! - [`FatalInitError`] aborts the pipeline: the scene stays "not ready".
//! - [`ModelLoadError`] is isolated to a single model and never propagates past
//!   the [`LoadCoordinator`](crate::coordinator::LoadCoordinator).
//! - [`SceneError`] and [`ShapeError`] are returned by scene graph and shape
//!   factory operations.

use thiserror::Error;

use crate::{data_structures::scene_graph::NodeId, shapes::ShapeKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scene configuration could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no model descriptors are configured")]
    NoModels,
    #[error("texture `{0}` is declared more than once")]
    DuplicateTexture(String),
    #[error("model `{path}` has a non-positive scale ({scale})")]
    InvalidScale { path: String, scale: f32 },
    #[error("plain-object texture `{0}` is not part of the texture manifest")]
    MissingTexture(String),
    #[error("animated model index {index} is out of range for {len} models")]
    AnimatedModelOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum FatalInitError {
    #[error("invalid scene configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("texture `{name}` failed to load: {source:#}")]
    Textures {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// A single model could not be loaded. The rest of the scene is unaffected.
#[derive(Debug, Error)]
#[error("failed to load model `{path}`: {source:#}")]
pub struct ModelLoadError {
    pub path: String,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} is not part of the scene graph")]
    UnknownNode(NodeId),
}

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("unknown shape kind `{0}`")]
    UnknownKind(String),
    #[error("shape kind {0:?} has required parameters and no defaults")]
    MissingParameters(ShapeKind),
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("{name} must be at least 1")]
    InvalidSegments { name: &'static str },
    #[error("text shapes need at least one visible character")]
    EmptyText,
    #[error("font has no glyphs for {0:?}")]
    MissingGlyphs(Vec<char>),
}
