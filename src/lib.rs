//! racecar-viewer
//!
//! Procedurally generated race-car body geometry and a small wgpu viewer for it,
//! running natively and on the web. Every panel is built from a handful of
//! parameters, assembled into a scene graph and drawn with an orbit/zoom camera.
//!
//! High-level modules
//! - `geometry`: mesh generators (venturi floor, chassis loft, airfoils, swept tubes, primitives)
//! - `params`: every shape constant of the car, with defaults
//! - `assembly`: builds the scene graph from the parameters
//! - `data_structures`: scene graph, transforms, materials and their GPU counterparts
//! - `scene`: the assembled scene with its lights and fog
//! - `camera`: look-at camera, view presets and projection
//! - `interaction`: orbit/zoom/preset state machine
//! - `render` / `renderer`: the renderer seam and its wgpu implementation
//! - `render_loop`: per-frame driver with ordered teardown
//! - `context`, `pipelines`, `resources`: GPU setup, pipelines and uploads
//! - `viewer`: winit window and event loop
//!

pub mod assembly;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod geometry;
pub mod interaction;
pub mod params;
pub mod pipelines;
pub mod render;
pub mod render_loop;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod viewer;

// Re-exports commonly used types for convenience in downstream code.
pub use config::{ControlConfig, ViewerConfig};
pub use interaction::{InputEvent, InteractionController};
pub use render::{RenderError, Renderer};
