//! Window, event loop and input translation.
//!
//! The viewer owns one [`RenderLoop`] driving a [`GpuRenderer`]. winit events are
//! turned into [`InputEvent`]s (pointer, wheel, keys) and frames are driven from
//! `RedrawRequested`.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window, builds the scene and creates the GPU context
//!    (blocking on tokio natively, `spawn_local` plus a user event on the web)
//! 2. every `RedrawRequested` runs [`RenderLoop::frame`] and requests the next one
//! 3. closing the window or pressing Escape tears the loop down and exits

use std::{fmt::Debug, sync::Arc};

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    assembly::build_scene,
    camera::ViewPreset,
    config::ViewerConfig,
    context::Context,
    data_structures::material::MaterialPalette,
    interaction::{InputEvent, InteractionController},
    params::ShapeParameters,
    render_loop::RenderLoop,
    renderer::GpuRenderer,
    scene::Scene,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Scroll units per wheel line, matching what browsers report for `deltaY`.
pub const LINE_HEIGHT: f32 = 100.0;

/// Converts a winit wheel delta to browser-style units: positive zooms out.
pub fn wheel_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}

/// Keyboard bindings: `1`–`5` select presets, Space or `R` toggle auto-rotation.
pub fn input_for_key(key: KeyCode) -> Option<InputEvent> {
    let preset = match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => ViewPreset::Iso,
        KeyCode::Digit2 | KeyCode::Numpad2 => ViewPreset::Front,
        KeyCode::Digit3 | KeyCode::Numpad3 => ViewPreset::Side,
        KeyCode::Digit4 | KeyCode::Numpad4 => ViewPreset::Top,
        KeyCode::Digit5 | KeyCode::Numpad5 => ViewPreset::Rear,
        KeyCode::Space | KeyCode::KeyR => return Some(InputEvent::ToggleAutoRotate),
        _ => return None,
    };
    Some(InputEvent::SelectPreset(preset))
}

/// A minimized window has a zero-sized surface that cannot be drawn to.
pub fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// Builds the car with the viewer's fog and background applied.
pub fn build_viewer_scene(config: &ViewerConfig) -> anyhow::Result<Scene> {
    let mut scene = build_scene(&ShapeParameters::default(), &MaterialPalette::default())?;
    scene.fog = config.fog;
    scene.background = config.background;
    Ok(scene)
}

/// Everything that exists once the GPU is up.
pub(crate) struct AppState {
    window: Arc<Window>,
    render_loop: RenderLoop<GpuRenderer>,
    cursor: (f32, f32),
    frames: u32,
    last_report: Instant,
}

impl AppState {
    async fn new(window: Arc<Window>, config: ViewerConfig) -> anyhow::Result<Self> {
        let scene = build_viewer_scene(&config)?;
        let ctx = Context::new(window.clone(), &config).await?;
        let renderer = GpuRenderer::new(ctx, &scene, config.exposure);
        let controller = InteractionController::new(config.controls.clone());
        Ok(Self {
            window,
            render_loop: RenderLoop::new(scene, controller, renderer),
            cursor: (0.0, 0.0),
            frames: 0,
            last_report: Instant::now(),
        })
    }

    fn count_frame(&mut self) {
        self.frames += 1;
        let elapsed = self.last_report.elapsed();
        if elapsed >= FPS_REPORT_INTERVAL {
            log::debug!("{:.1} fps", self.frames as f32 / elapsed.as_secs_f32());
            self.frames = 0;
            self.last_report = Instant::now();
        }
    }

    fn update_title(&self, title: &str) {
        self.window.set_title(&format!(
            "{} | {}",
            title,
            self.render_loop.controller().status()
        ));
    }
}

/// Delivers the asynchronously created state on the web.
pub(crate) enum ViewerEvent {
    #[allow(dead_code)]
    Initialized(Box<anyhow::Result<AppState>>),
}

impl Debug for ViewerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(result) => {
                write!(f, "Initialized({})", if result.is_ok() { "ok" } else { "failed" })
            }
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<ViewerEvent>,
    config: ViewerConfig,
    state: Option<AppState>,
    initializing: bool,
}

impl App {
    fn new(event_loop: &EventLoop<ViewerEvent>, config: ViewerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            config,
            state: None,
            initializing: false,
        })
    }

    fn window_attributes(&self) -> anyhow::Result<WindowAttributes> {
        #[allow(unused_mut)]
        let mut attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(&self.config.canvas_id))
                .ok_or_else(|| anyhow::anyhow!("no element with id `{}`", self.config.canvas_id))?;
            attributes = attributes.with_canvas(Some(canvas.unchecked_into()));
        }

        Ok(attributes)
    }

    fn install(&mut self, event_loop: &ActiveEventLoop, state: anyhow::Result<AppState>) {
        self.initializing = false;
        match state {
            Ok(mut state) => {
                let size = state.window.inner_size();
                state.render_loop.resize(size.width, size.height);
                state.update_title(&self.config.title);
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Viewer initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.render_loop.teardown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.initializing {
            return;
        }
        let window = match self
            .window_attributes()
            .and_then(|attributes| Ok(event_loop.create_window(attributes)?))
        {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create the window: {e:#}");
                event_loop.exit();
                return;
            }
        };
        self.initializing = true;
        let init_future = AppState::new(window, self.config.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = self.async_runtime.block_on(init_future);
            self.install(event_loop, state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = init_future.await;
                if proxy
                    .send_event(ViewerEvent::Initialized(Box::new(state)))
                    .is_err()
                {
                    log::error!("Event loop closed before the viewer was initialized");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::Initialized(state) => self.install(event_loop, *state),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shut_down(event_loop),
            WindowEvent::Resized(size) => {
                state.render_loop.resize(size.width, size.height);
                if is_drawable(size) && state.render_loop.is_scheduled() {
                    state.window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.cursor = (position.x as f32, position.y as f32);
                let (x, y) = state.cursor;
                state.render_loop.handle(InputEvent::PointerMove { x, y });
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = state.cursor;
                state.render_loop.handle(InputEvent::PointerDown { x, y });
                state.update_title(&self.config.title);
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            }
            | WindowEvent::CursorLeft { .. } => state.render_loop.handle(InputEvent::PointerUp),
            WindowEvent::MouseWheel { delta, .. } => {
                state.render_loop.handle(InputEvent::Scroll {
                    delta_y: wheel_delta(delta),
                });
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && !event.repeat =>
            {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if code == KeyCode::Escape {
                    self.shut_down(event_loop);
                } else if let Some(input) = input_for_key(code) {
                    state.render_loop.handle(input);
                    state.update_title(&self.config.title);
                }
            }
            WindowEvent::RedrawRequested => match state.render_loop.frame() {
                Ok(true) => {
                    state.count_frame();
                    state.window.request_redraw();
                }
                Ok(false) => (),
                Err(e) if e.is_recoverable() => {
                    log::warn!("Skipping frame: {e}");
                    let size = state.window.inner_size();
                    state.render_loop.resize(size.width, size.height);
                    // Minimized: wait for the next `Resized` instead of spinning.
                    if is_drawable(size) {
                        state.window.request_redraw();
                    }
                }
                Err(e) => {
                    log::error!("Unable to render: {e}");
                    self.shut_down(event_loop);
                }
            },
            _ => {}
        }
    }
}

/// Opens the viewer and runs until the window is closed.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| anyhow::anyhow!("could not initialize the console logger: {e}"))?;
    }

    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run(ViewerConfig::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn wheel_lines_scale_to_browser_units() {
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -1.0)), 100.0);
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, 2.0)), -200.0);
        assert_eq!(
            wheel_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 30.0))),
            -30.0
        );
    }

    #[test]
    fn minimized_windows_are_not_drawable() {
        assert!(is_drawable(PhysicalSize::new(800, 600)));
        assert!(!is_drawable(PhysicalSize::new(0, 600)));
        assert!(!is_drawable(PhysicalSize::new(800, 0)));
        assert!(!is_drawable(PhysicalSize::new(0, 0)));
    }

    #[test]
    fn digit_keys_select_presets_in_order() {
        let keys = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
        ];
        for (key, preset) in keys.into_iter().zip(ViewPreset::ALL) {
            assert_eq!(input_for_key(key), Some(InputEvent::SelectPreset(preset)));
        }
        assert_eq!(input_for_key(KeyCode::KeyR), Some(InputEvent::ToggleAutoRotate));
        assert_eq!(input_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn viewer_scene_takes_fog_from_config() {
        let mut config = ViewerConfig::default();
        config.fog.far = 75.0;
        let scene = build_viewer_scene(&config).expect("default car builds");
        assert_eq!(scene.fog.far, 75.0);
        assert_eq!(scene.background, config.background);
    }
}
