//! flow-scene
//!
//! An interactive 3D scene for the browser (and a native window during
//! development) built around an asynchronous readiness pipeline: a texture
//! batch, two model loader strategies and a load coordinator that flips the
//! scene to "ready" exactly once. Procedural shapes spin and loaded clips loop
//! on a continuous frame loop.
//!
//! High-level modules
//! - `pipeline`: texture batch, model loads and the one-time post-load setup
//! - `coordinator`: completion tracking for independent asynchronous loads
//! - `resources`: asset sources, glTF/OBJ strategies, textures and fonts
//! - `shapes`: parametric shape descriptors and their placement
//! - `spin` / `animation`: time-derived rotation and looping clip playback
//! - `frame`: the per-frame driver
//! - `flow`: window, event loop and runtime glue
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod data_structures;
pub mod environment;
pub mod error;
pub mod flow;
pub mod frame;
pub mod pipeline;
pub mod render;
pub mod resources;
pub mod shapes;
pub mod spin;
pub mod state;
pub mod tween;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use config::SceneConfig;
pub use pipeline::{LoadingIndicator, ReadyReport, ScenePipeline};
