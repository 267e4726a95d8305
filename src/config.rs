//! Viewer configuration.
//!
//! There are no config files: the binary runs with `ViewerConfig::default()` and
//! embedders construct their own value.

use crate::{data_structures::material::srgb_hex_to_linear, scene::Fog};

/// Tuning of the orbit/zoom controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlConfig {
    /// Radians of orbit per pixel of pointer travel, for both yaw and pitch.
    pub drag_sensitivity: f32,
    /// Relative zoom per scroll unit.
    pub zoom_sensitivity: f32,
    /// Yaw advanced per frame while auto-rotating.
    pub auto_rotate_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub initial_pitch: f32,
    pub initial_yaw: f32,
    pub auto_rotate: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.005,
            zoom_sensitivity: 0.001,
            auto_rotate_step: 0.002,
            min_distance: 1.0,
            max_distance: 80.0,
            initial_pitch: -0.2,
            initial_yaw: 0.5,
            auto_rotate: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Id of the canvas element the viewer attaches to on the web.
    pub canvas_id: String,
    /// Clear colour, linear RGB.
    pub background: [f32; 3],
    pub fog: Fog,
    pub exposure: f32,
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub controls: ControlConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "SF-26 production geometry".to_string(),
            width: 1600,
            height: 900,
            canvas_id: "canvas".to_string(),
            background: srgb_hex_to_linear(0x0A0A0A),
            fog: Fog::default(),
            exposure: 1.2,
            fov_degrees: 45.0,
            znear: 0.1,
            zfar: 100.0,
            controls: ControlConfig::default(),
        }
    }
}
