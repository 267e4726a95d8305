//! Scene data structures: nodes, transforms, materials and their GPU counterparts.
//!
//! - `instance` holds per-node transformation data and its GPU layout
//! - `material` holds surface parameters and the shared palette
//! - `model` contains GPU meshes and materials plus draw helpers
//! - `scene_graph` enables hierarchical scene organization and mirroring
//! - `texture` wraps the depth buffer

pub mod instance;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
