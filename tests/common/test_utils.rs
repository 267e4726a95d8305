use std::rc::Rc;

use cgmath::Quaternion;
use racecar_viewer::{
    assembly::build_scene,
    camera::Camera,
    data_structures::material::MaterialPalette,
    params::ShapeParameters,
    render::{RenderError, Renderer},
    render_loop::LoopState,
    scene::Scene,
};

/// What the renderer saw during one `render` call.
#[derive(Clone, Debug)]
pub struct Frame {
    pub camera: Camera,
    pub root_rotation: Quaternion<f32>,
    pub meshes: usize,
}

/// Loop state as seen from inside `dispose`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisposeSnapshot {
    pub scheduled: bool,
    pub listening: bool,
}

/// A `Renderer` that draws nothing and remembers every call.
#[derive(Default)]
pub struct RecordingRenderer {
    frames: Vec<Frame>,
    resizes: Vec<(u32, u32)>,
    dispose_invocations: u32,
    fail_next: Option<RenderError>,
    events: Vec<&'static str>,
    loop_state: Option<Rc<LoopState>>,
    at_dispose: Option<DisposeSnapshot>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `render` call fail with `error`.
    pub fn fail_next(&mut self, error: RenderError) {
        self.fail_next = Some(error);
    }

    /// Reads `state` whenever `dispose` runs.
    pub fn watch(&mut self, state: Rc<LoopState>) {
        self.loop_state = Some(state);
    }

    /// Every call in order: `"render"`, `"resize"` or `"dispose"`.
    pub fn events(&self) -> &[&'static str] {
        &self.events
    }

    pub fn at_dispose(&self) -> Option<DisposeSnapshot> {
        self.at_dispose
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn render_invocations(&self) -> usize {
        self.frames.len()
    }

    pub fn resizes(&self) -> &[(u32, u32)] {
        &self.resizes
    }

    pub fn dispose_invocations(&self) -> u32 {
        self.dispose_invocations
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        self.events.push("render");
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        self.frames.push(Frame {
            camera: camera.clone(),
            root_rotation: scene.rotation(),
            meshes: scene.mesh_count(),
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.events.push("resize");
        self.resizes.push((width, height));
    }

    fn dispose(&mut self) {
        self.events.push("dispose");
        self.dispose_invocations += 1;
        if let Some(state) = &self.loop_state {
            self.at_dispose = Some(DisposeSnapshot {
                scheduled: state.is_scheduled(),
                listening: state.is_listening(),
            });
        }
    }
}

pub fn default_scene() -> Scene {
    build_scene(&ShapeParameters::default(), &MaterialPalette::default())
        .expect("the default car must build")
}

pub fn assert_close(actual: f32, expected: f32, eps: f32) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected}, got {actual} (eps {eps})"
    );
}
