//! Standalone quad-view window backed by winit.
//!
//! ```no_run
//! # use quadview::Viewer;
//! Viewer::builder()
//!     .with_title("Quadview")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{
    ops::ControlFlow as KeyFlow,
    sync::Arc,
    time::{Duration, Instant},
};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::ViewerError,
    gpu::{backend::GpuBackend, render_context::RenderContext},
    gui::ControlPanel,
    input::{InputEvent, MouseButton},
    options::Options,
    viewport::FramebufferSize,
    SceneEngine,
};

/// How often the panel summary is copied into the window title.
const TITLE_REFRESH: Duration = Duration::from_millis(250);

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: Option<String>,
}

impl ViewerBuilder {
    /// Create a builder with default options and the options' title.
    const fn new() -> Self {
        Self {
            options: None,
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let mut options = self.options.unwrap_or_default();
        if let Some(title) = self.title {
            options.window.title = title;
        }
        Viewer { options }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window showing the scene through four viewports.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub const fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed or the exit key is pressed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Viewer`] if the event loop cannot be created
    /// or fails.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop =
            EventLoop::new().map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            state: None,
            options: Some(self.options),
            last_title_update: Instant::now(),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewerError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Everything that exists once the GPU is up.
struct ViewerState {
    engine: SceneEngine,
    backend: GpuBackend,
    panel: ControlPanel,
}

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    state: Option<ViewerState>,
    /// Startup options, consumed when the window is created.
    options: Option<Options>,
    last_title_update: Instant,
}

/// The surface always covers the full window.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

fn init_state(
    window: &Arc<Window>,
    options: Options,
) -> Result<ViewerState, ViewerError> {
    let (width, height) = viewport_size(window.inner_size());
    let context =
        pollster::block_on(RenderContext::new(window.clone(), (width, height)))?;
    let mut backend = GpuBackend::new(context);
    let engine = SceneEngine::new(
        FramebufferSize::new(width, height),
        options,
        &mut backend,
    )?;
    let mut panel = ControlPanel::new();
    panel.refresh(&engine);
    Ok(ViewerState {
        engine,
        backend,
        panel,
    })
}

impl ViewerApp {
    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let (width, height) = viewport_size(size);
        if let Some(state) = &mut self.state {
            state.engine.resize(width, height);
            state.backend.resize(width, height);
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(state)) = (&self.window, &mut self.state) else {
            return;
        };

        let _ = state.engine.tick();
        state.panel.refresh(&state.engine);
        state.engine.render(&mut state.backend, &mut state.panel);
        match state.backend.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                state.backend.reconfigure();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }

        let now = Instant::now();
        if now.duration_since(self.last_title_update) >= TITLE_REFRESH {
            let title = &state.engine.options().window.title;
            window.set_title(&format!("{title} - {}", state.panel.summary()));
            self.last_title_update = now;
        }
        window.request_redraw();
    }

    fn pointer(&mut self, event: InputEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let Some(edit) = state.panel.handle_cursor(event) {
            if let Err(e) =
                state.engine.set_option(&edit.section, &edit.field, edit.value)
            {
                log::warn!("panel edit rejected: {e}");
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title(&options.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                options.window.width,
                options.window.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match init_state(&window, options) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("Failed to initialize viewer: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: both window and state must be initialised.
        if self.window.is_none() || self.state.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => self.resize(size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(inner) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.resize(inner);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                self.pointer(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.pointer(InputEvent::Scroll {
                    delta: scroll_delta,
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::PhysicalKey;

                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };

                let key_str = format!("{code:?}");
                let Some(state) = &mut self.state else {
                    return;
                };
                if let Some(action) =
                    state.engine.options().keybindings.lookup(&key_str)
                {
                    log::debug!("{key_str} -> {action:?}");
                    if let KeyFlow::Break(()) = action.execute(&mut state.engine) {
                        event_loop.exit();
                    }
                }
            }

            _ => (),
        }
    }
}
