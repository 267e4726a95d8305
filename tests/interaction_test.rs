use std::f32::consts::{FRAC_PI_2, TAU};

use cgmath::{InnerSpace, Point3, Quaternion, Rad, Rotation3};
use racecar_viewer::{
    ControlConfig, InputEvent, InteractionController,
    camera::ViewPreset,
    interaction::{DragState, OrbitState},
};

use crate::common::test_utils::assert_close;

#[allow(dead_code)]
mod common;

#[test]
fn pitch_stays_clamped_under_arbitrary_drags() {
    let mut controller = InteractionController::default();
    let mut seed: u32 = 0x2545_F491;
    let (mut x, mut y) = (400.0_f32, 300.0_f32);
    controller.pointer_down(x, y);
    for _ in 0..2_000 {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let dx = ((seed >> 8) % 401) as f32 - 200.0;
        let dy = ((seed >> 16) % 801) as f32 - 400.0;
        x += dx;
        y += dy;
        controller.pointer_move(x, y);
        let orbit = controller.orbit();
        assert!(orbit.pitch >= -FRAC_PI_2 && orbit.pitch <= FRAC_PI_2);
        assert!(orbit.yaw >= 0.0 && orbit.yaw < TAU);
    }
    controller.pointer_up();
    assert_eq!(controller.drag(), DragState::Idle);
}

#[test]
fn dragging_far_down_pins_pitch_at_the_limit() {
    let mut controller = InteractionController::default();
    controller.handle(InputEvent::PointerDown { x: 0.0, y: 0.0 });
    controller.handle(InputEvent::PointerMove { x: 0.0, y: 10_000.0 });
    assert_eq!(controller.orbit().pitch, FRAC_PI_2);
    controller.handle(InputEvent::PointerMove { x: 0.0, y: -10_000.0 });
    assert_eq!(controller.orbit().pitch, -FRAC_PI_2);
}

#[test]
fn presets_set_literal_cameras_and_are_idempotent() {
    let expected = [
        (ViewPreset::Iso, [10.0, 5.0, 10.0], [3.0, 1.0, 0.0]),
        (ViewPreset::Front, [0.0, 2.0, 15.0], [3.0, 1.0, 0.0]),
        (ViewPreset::Side, [20.0, 3.0, 0.0], [3.0, 1.0, 0.0]),
        (ViewPreset::Top, [3.0, 20.0, 0.0], [3.0, 0.0, 0.0]),
        (ViewPreset::Rear, [6.0, 2.0, -15.0], [3.0, 1.0, 0.0]),
    ];
    let mut controller = InteractionController::default();
    controller.pointer_down(0.0, 0.0);
    controller.pointer_move(120.0, 40.0);
    controller.pointer_up();
    controller.scroll(350.0);

    for (preset, position, target) in expected {
        controller.select_preset(preset);
        let once = (controller.camera().clone(), controller.orbit(), controller.auto_rotate());
        controller.select_preset(preset);
        let twice = (controller.camera().clone(), controller.orbit(), controller.auto_rotate());
        assert_eq!(once, twice);

        assert_eq!(controller.camera().position, Point3::from(position));
        assert_eq!(controller.camera().target, Point3::from(target));
        assert_eq!(controller.orbit(), OrbitState::ZERO);
        assert_eq!(controller.preset(), preset);
    }
}

#[test]
fn presets_leave_auto_rotate_alone() {
    let mut controller = InteractionController::default();
    assert!(controller.auto_rotate());
    controller.select_preset(ViewPreset::Top);
    assert!(controller.auto_rotate());

    controller.toggle_auto_rotate();
    controller.select_preset(ViewPreset::Side);
    assert!(!controller.auto_rotate());
}

#[test]
fn ticks_advance_yaw_by_a_fixed_step() {
    let controls = ControlConfig::default();
    let step = controls.auto_rotate_step;
    let mut controller = InteractionController::new(controls);
    let start = controller.orbit();

    let n = 1_000;
    for _ in 0..n {
        controller.tick();
    }
    let expected = (start.yaw + n as f32 * step).rem_euclid(TAU);
    assert_close(controller.orbit().yaw, expected, 1e-3);
    assert_eq!(controller.orbit().pitch, start.pitch);
}

#[test]
fn ticks_do_nothing_while_auto_rotate_is_off() {
    let mut controller = InteractionController::default();
    controller.handle(InputEvent::ToggleAutoRotate);
    let before = controller.orbit();
    for _ in 0..100 {
        controller.tick();
    }
    assert_eq!(controller.orbit(), before);
}

#[test]
fn click_without_move_stops_auto_rotate_only() {
    let mut controller = InteractionController::default();
    let before = controller.orbit();
    controller.handle(InputEvent::PointerDown { x: 12.0, y: 34.0 });
    controller.handle(InputEvent::PointerUp);
    assert_eq!(controller.orbit(), before);
    assert!(!controller.auto_rotate());

    controller.tick();
    assert_eq!(controller.orbit(), before);
}

#[test]
fn zoom_is_multiplicative() {
    let mut controller = InteractionController::default();
    let d0 = controller.camera().distance();
    controller.handle(InputEvent::Scroll { delta_y: 100.0 });
    assert_close(controller.camera().distance(), d0 * 1.1, 1e-4);
    controller.handle(InputEvent::Scroll { delta_y: 100.0 });
    assert_close(controller.camera().distance(), d0 * 1.1 * 1.1, 1e-4);
    controller.handle(InputEvent::Scroll { delta_y: -100.0 });
    assert_close(controller.camera().distance(), d0 * 1.1 * 1.1 * 0.9, 1e-4);

    let camera = controller.camera();
    let (eye, target) = ViewPreset::Iso.eye_and_target();
    let original = (Point3::from(eye) - Point3::from(target)).normalize();
    assert!(((camera.position - camera.target).normalize() - original).magnitude() < 1e-5);
}

#[test]
fn scene_rotation_is_pitch_then_yaw() {
    let mut controller = InteractionController::default();
    controller.select_preset(ViewPreset::Iso);
    controller.pointer_down(0.0, 0.0);
    controller.pointer_move(100.0, 60.0);
    let OrbitState { pitch, yaw } = controller.orbit();
    let expected: Quaternion<f32> =
        Quaternion::from_angle_x(Rad(pitch)) * Quaternion::from_angle_y(Rad(yaw));
    let actual = controller.scene_rotation();
    assert!((actual - expected).magnitude() < 1e-6);
}
