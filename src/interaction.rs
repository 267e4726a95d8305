//! Orbit, zoom and view presets.
//!
//! [`InteractionController`] is a plain state machine. Input handlers call its
//! methods synchronously; the render loop calls [`InteractionController::tick`] once
//! per frame and reads [`InteractionController::scene_rotation`]. Nothing here knows
//! about windows or GPUs, so drag and zoom sequences can be tested directly.

use std::f32::consts::{FRAC_PI_2, TAU};

use cgmath::{Quaternion, Rad, Rotation3};
use log::debug;

use crate::{
    camera::{Camera, ViewPreset},
    config::ControlConfig,
};

/// Rotation applied to the model: `pitch` about X, `yaw` about Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitState {
    pub pitch: f32,
    pub yaw: f32,
}

impl OrbitState {
    pub const ZERO: OrbitState = OrbitState { pitch: 0.0, yaw: 0.0 };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer position at the last processed event.
    Dragging { anchor: (f32, f32) },
}

/// Host input, already translated to device pixels and browser-style scroll units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    /// Positive values zoom out.
    Scroll { delta_y: f32 },
    SelectPreset(ViewPreset),
    ToggleAutoRotate,
}

fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

#[derive(Clone, Debug)]
pub struct InteractionController {
    orbit: OrbitState,
    auto_rotate: bool,
    drag: DragState,
    camera: Camera,
    preset: ViewPreset,
    controls: ControlConfig,
}

impl InteractionController {
    pub fn new(controls: ControlConfig) -> Self {
        Self {
            orbit: OrbitState {
                pitch: controls.initial_pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
                yaw: wrap_angle(controls.initial_yaw),
            },
            auto_rotate: controls.auto_rotate,
            drag: DragState::Idle,
            camera: ViewPreset::Iso.camera(),
            preset: ViewPreset::Iso,
            controls,
        }
    }

    pub fn orbit(&self) -> OrbitState {
        self.orbit
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn preset(&self) -> ViewPreset {
        self.preset
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(x, y),
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::Scroll { delta_y } => self.scroll(delta_y),
            InputEvent::SelectPreset(preset) => self.select_preset(preset),
            InputEvent::ToggleAutoRotate => self.toggle_auto_rotate(),
        }
    }

    /// Starts a drag. Manual control always stops auto-rotation.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag = DragState::Dragging { anchor: (x, y) };
        self.auto_rotate = false;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let DragState::Dragging { anchor } = self.drag else {
            return;
        };
        let k = self.controls.drag_sensitivity;
        let (dx, dy) = (x - anchor.0, y - anchor.1);
        self.orbit.yaw = wrap_angle(self.orbit.yaw + dx * k);
        self.orbit.pitch = (self.orbit.pitch + dy * k).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.drag = DragState::Dragging { anchor: (x, y) };
    }

    /// Ends a drag. Auto-rotation is not resumed.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Scales the camera's distance to its target by `1 + delta_y * zoom_sensitivity`.
    pub fn scroll(&mut self, delta_y: f32) {
        let factor = (1.0 + delta_y * self.controls.zoom_sensitivity).max(f32::EPSILON);
        let distance = (self.camera.distance() * factor)
            .clamp(self.controls.min_distance, self.controls.max_distance);
        self.camera.set_distance(distance);
        debug!("Zoom to distance {:.2}", distance);
    }

    /// Jumps to a preset viewpoint, resetting the orbit. Auto-rotation is left as is.
    pub fn select_preset(&mut self, preset: ViewPreset) {
        self.camera = preset.camera();
        self.orbit = OrbitState::ZERO;
        self.preset = preset;
        debug!("View preset {}", preset);
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.auto_rotate = !self.auto_rotate;
        debug!("Auto-rotate {}", if self.auto_rotate { "on" } else { "off" });
    }

    /// Advances one frame.
    pub fn tick(&mut self) {
        if self.auto_rotate {
            self.orbit.yaw = wrap_angle(self.orbit.yaw + self.controls.auto_rotate_step);
        }
    }

    /// The rotation to write to the scene root this frame.
    pub fn scene_rotation(&self) -> Quaternion<f32> {
        Quaternion::from_angle_x(Rad(self.orbit.pitch)) * Quaternion::from_angle_y(Rad(self.orbit.yaw))
    }

    /// One-line summary of the controller state, shown in the window title.
    pub fn status(&self) -> String {
        format!(
            "{} view, auto-rotate {}",
            self.preset,
            if self.auto_rotate { "on" } else { "off" }
        )
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ControlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_without_a_drag_are_ignored() {
        let mut controller = InteractionController::default();
        let before = controller.orbit();
        controller.pointer_move(100.0, 50.0);
        assert_eq!(controller.orbit(), before);
        assert!(controller.auto_rotate());
    }

    #[test]
    fn drag_uses_the_delta_from_the_last_position() {
        let mut controller = InteractionController::default();
        let start = controller.orbit();
        controller.pointer_down(10.0, 10.0);
        controller.pointer_move(30.0, 10.0);
        controller.pointer_move(50.0, 20.0);
        let orbit = controller.orbit();
        assert!((orbit.yaw - (start.yaw + 40.0 * 0.005)).abs() < 1e-6);
        assert!((orbit.pitch - (start.pitch + 10.0 * 0.005)).abs() < 1e-6);
        assert_eq!(controller.drag(), DragState::Dragging { anchor: (50.0, 20.0) });
    }

    #[test]
    fn zoom_is_clamped() {
        let mut controller = InteractionController::default();
        for _ in 0..100 {
            controller.scroll(900.0);
        }
        assert!((controller.camera().distance() - 80.0).abs() < 1e-3);
        for _ in 0..100 {
            controller.scroll(-5000.0);
        }
        assert!((controller.camera().distance() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn toggling_twice_restores_auto_rotate() {
        let mut controller = InteractionController::default();
        controller.toggle_auto_rotate();
        assert!(!controller.auto_rotate());
        controller.handle(InputEvent::ToggleAutoRotate);
        assert!(controller.auto_rotate());
    }

    #[test]
    fn status_reflects_state() {
        let mut controller = InteractionController::default();
        controller.select_preset(ViewPreset::Rear);
        controller.toggle_auto_rotate();
        assert_eq!(controller.status(), "REAR view, auto-rotate off");
    }
}
