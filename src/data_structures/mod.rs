//! Engine data structures: scene graph, transforms, meshes and textures.
//!
//! - `scene_graph` is the node arena everything gets placed into
//! - `transform` holds per-node position, Euler rotation and scale
//! - `mesh` contains vertex data parsed from model files
//! - `texture` contains decoded images shared through handles

pub mod mesh;
pub mod scene_graph;
pub mod texture;
pub mod transform;
