use cgmath::InnerSpace;
use racecar_viewer::{
    InputEvent, InteractionController, RenderError,
    camera::ViewPreset,
    render_loop::RenderLoop,
};

use crate::common::test_utils::{DisposeSnapshot, RecordingRenderer, default_scene};

#[allow(dead_code)]
mod common;

fn render_loop() -> RenderLoop<RecordingRenderer> {
    RenderLoop::new(
        default_scene(),
        InteractionController::default(),
        RecordingRenderer::new(),
    )
}

#[test]
fn renderer_sees_the_rotation_after_the_tick() {
    let mut lp = render_loop();
    assert!(lp.is_scheduled());

    for _ in 0..3 {
        assert_eq!(lp.frame(), Ok(true));
        let frame = lp.renderer().frames().last().cloned().unwrap();
        let expected = lp.controller().scene_rotation();
        assert!((frame.root_rotation - expected).magnitude() < 1e-6);
        assert_eq!(&frame.camera, lp.controller().camera());
        assert_eq!(frame.meshes, lp.scene().mesh_count());
    }
    assert_eq!(lp.renderer().render_invocations(), 3);

    let scalars: Vec<f32> = lp
        .renderer()
        .frames()
        .iter()
        .map(|f| f.root_rotation.s)
        .collect();
    assert!(scalars.windows(2).all(|w| w[0] != w[1]), "auto-rotate must advance each frame");
}

#[test]
fn input_reaches_the_controller() {
    let mut lp = render_loop();
    lp.handle(InputEvent::SelectPreset(ViewPreset::Side));
    lp.handle(InputEvent::ToggleAutoRotate);
    assert_eq!(lp.controller().preset(), ViewPreset::Side);
    assert!(!lp.controller().auto_rotate());

    lp.frame().unwrap();
    let frame = &lp.renderer().frames()[0];
    assert_eq!(frame.camera.position, cgmath::Point3::new(20.0, 3.0, 0.0));
}

#[test]
fn teardown_is_idempotent() {
    let mut lp = render_loop();
    lp.frame().unwrap();
    lp.teardown();
    lp.teardown();

    assert_eq!(lp.renderer().dispose_invocations(), 1);
    assert!(lp.is_torn_down());
    assert!(!lp.is_scheduled());
    assert!(!lp.listeners_attached());

    assert_eq!(lp.frame(), Ok(false));
    assert_eq!(lp.renderer().render_invocations(), 1);
}

#[test]
fn teardown_stops_scheduling_and_input_before_disposing() {
    let mut lp = render_loop();
    let state = lp.state();
    lp.renderer_mut().watch(state.clone());
    lp.frame().unwrap();
    assert!(state.is_scheduled() && state.is_listening());

    lp.teardown();
    assert_eq!(
        lp.renderer().at_dispose(),
        Some(DisposeSnapshot {
            scheduled: false,
            listening: false,
        })
    );
    assert_eq!(lp.renderer().events(), ["render", "dispose"]);
    assert!(!state.is_scheduled() && !state.is_listening());
}

#[test]
fn dropping_the_loop_tears_it_down() {
    let lp = render_loop();
    let state = lp.state();
    drop(lp);
    assert!(!state.is_scheduled());
    assert!(!state.is_listening());
}

#[test]
fn input_and_resizes_are_ignored_after_teardown() {
    let mut lp = render_loop();
    lp.resize(800, 600);
    lp.teardown();

    let before = lp.controller().orbit();
    lp.handle(InputEvent::PointerDown { x: 0.0, y: 0.0 });
    lp.handle(InputEvent::PointerMove { x: 300.0, y: 200.0 });
    lp.handle(InputEvent::Scroll { delta_y: 500.0 });
    assert_eq!(lp.controller().orbit(), before);
    assert!(lp.controller().auto_rotate());

    lp.resize(1024, 768);
    assert_eq!(lp.renderer().resizes(), [(800, 600)]);
}

#[test]
fn recoverable_errors_keep_the_loop_scheduled() {
    let mut lp = render_loop();
    lp.renderer_mut().fail_next(RenderError::SurfaceLost);
    assert_eq!(lp.frame(), Err(RenderError::SurfaceLost));
    assert!(lp.is_scheduled());

    assert_eq!(lp.frame(), Ok(true));
    assert_eq!(lp.renderer().render_invocations(), 1);
}

#[test]
fn fatal_errors_stop_the_loop() {
    let mut lp = render_loop();
    lp.renderer_mut().fail_next(RenderError::OutOfMemory);
    assert_eq!(lp.frame(), Err(RenderError::OutOfMemory));
    assert!(!lp.is_scheduled());

    assert_eq!(lp.frame(), Ok(false));
    assert_eq!(lp.renderer().render_invocations(), 0);
}
