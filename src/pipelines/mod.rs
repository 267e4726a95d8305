//! Render pipelines and their uniforms.
//!
//! - `basic` holds the shared pipeline builder and the opaque pipeline
//! - `transparent` is the alpha-blended pass without depth writes
//! - `lines` draws line lists unlit
//! - `light` holds the lights/fog uniform bound at group 2

pub mod basic;
pub mod light;
pub mod lines;
pub mod transparent;
