//! Per-frame driver tying the scene, the controller and a [`Renderer`] together.
//!
//! The host (a winit window or a test) asks for frames while [`RenderLoop::frame`]
//! returns `Ok(true)` and forwards input through [`RenderLoop::handle`].

use std::{cell::Cell, rc::Rc};

use crate::{
    interaction::{InputEvent, InteractionController},
    render::{RenderError, Renderer},
    scene::Scene,
};

/// Whether a frame is scheduled and input is attached.
///
/// Shared through [`RenderLoop::state`] so observers can read it while the loop is busy,
/// e.g. from inside [`Renderer::dispose`].
#[derive(Debug)]
pub struct LoopState {
    scheduled: Cell<bool>,
    listening: Cell<bool>,
}

impl LoopState {
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.get()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.get()
    }
}

pub struct RenderLoop<R: Renderer> {
    scene: Scene,
    controller: InteractionController,
    renderer: R,
    state: Rc<LoopState>,
    torn_down: bool,
}

impl<R: Renderer> RenderLoop<R> {
    /// Starts with the first frame scheduled and input attached.
    pub fn new(scene: Scene, controller: InteractionController, renderer: R) -> Self {
        Self {
            scene,
            controller,
            renderer,
            state: Rc::new(LoopState {
                scheduled: Cell::new(true),
                listening: Cell::new(true),
            }),
            torn_down: false,
        }
    }

    /// Runs one frame if one is scheduled: tick the controller, write the root rotation,
    /// update world transforms, render and reschedule.
    ///
    /// Returns whether another frame should be requested. A recoverable render error
    /// keeps the loop scheduled so the host can reconfigure and retry; any other error
    /// leaves nothing scheduled.
    pub fn frame(&mut self) -> Result<bool, RenderError> {
        if !self.state.is_scheduled() {
            return Ok(false);
        }
        self.state.scheduled.set(false);

        self.controller.tick();
        self.scene.set_rotation(self.controller.scene_rotation());
        self.scene.update_world_transforms();

        match self.renderer.render(&self.scene, self.controller.camera()) {
            Ok(()) => {
                self.state.scheduled.set(true);
                Ok(true)
            }
            Err(e) => {
                self.state.scheduled.set(e.is_recoverable());
                Err(e)
            }
        }
    }

    /// Routes input to the controller. Dropped once input is detached.
    pub fn handle(&mut self, event: InputEvent) {
        if self.state.is_listening() {
            self.controller.handle(event);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.torn_down {
            self.renderer.resize(width, height);
        }
    }

    /// Stops the loop: cancel the scheduled frame, detach input, then release renderer
    /// resources. Calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.state.scheduled.set(false);
        self.state.listening.set(false);
        self.renderer.dispose();
        self.torn_down = true;
        log::info!("Render loop torn down");
    }

    pub fn is_scheduled(&self) -> bool {
        self.state.is_scheduled()
    }

    pub fn listeners_attached(&self) -> bool {
        self.state.is_listening()
    }

    pub fn state(&self) -> Rc<LoopState> {
        Rc::clone(&self.state)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: Renderer> Drop for RenderLoop<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
