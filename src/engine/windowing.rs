use std::sync::Arc;
use std::time::Instant;

use crate::engine::console::{Console, ConsoleBackend};
use crate::engine::user_input::UserInput;
use crate::engine::{EngineError, EngineResult, SceneRuntime};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

/// Frames longer than this (window dragged, laptop asleep) count as this long.
const MAX_FRAME_DT: f32 = 0.1;

/// Minimal winit wrapper (ApplicationHandler style) that stands in for the
/// browser: it drives the scene runtime one frame per redraw.
pub struct Windowing;

impl Windowing {
    /// Run until the window closes. Fails with `EventLoop`/`Window` when the
    /// host cannot show a window, which the caller treats as "no 3D".
    pub fn run_app(
        runtime: &mut SceneRuntime,
        size: (u32, u32),
        console: Option<&Console>,
    ) -> EngineResult<()> {
        let event_loop = EventLoop::new().map_err(|e| EngineError::EventLoop(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App {
            window: None,
            input: UserInput::new(size.0 as f32, size.1 as f32),
            runtime,
            size,
            console,
            backend: ConsoleBackend::new(),
            last_frame: None,
            title: String::new(),
            error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| EngineError::EventLoop(e.to_string()))?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App<'a> {
    window: Option<Arc<Window>>,
    input: UserInput,
    runtime: &'a mut SceneRuntime,
    size: (u32, u32),
    console: Option<&'a Console>,
    backend: ConsoleBackend,
    last_frame: Option<Instant>,
    title: String,
    error: Option<EngineError>,
}

impl App<'_> {
    fn refresh_title(&mut self) {
        let status = self.runtime.status();
        let title = format!("studio-scene - {} - {}", status.scene, status.path);
        if title != self.title {
            if let Some(w) = &self.window {
                w.set_title(&title);
            }
            self.title = title;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .replace(now)
            .map(|prev| (now - prev).as_secs_f32().min(MAX_FRAME_DT))
            .unwrap_or(0.0);

        if let Some(console) = self.console {
            let lines = console.try_recv_all();
            if self.backend.exec_all(self.runtime, lines) {
                event_loop.exit();
                return;
            }
        }

        self.input.emit_commands(self.runtime.commands_mut());
        if self.input.state().interacted() {
            self.runtime.mark_interaction();
        }
        self.input.begin_frame();

        let report = self.runtime.frame(dt);
        for c in &report.committed {
            log::debug!("committed {} -> {} (deferred: {})", c.path, c.scene, c.deferred);
        }
        if let Some(tier) = report.tier_changed {
            log::info!(
                "render quality {:?}, pixel ratio {:.2}",
                tier,
                self.runtime.quality().pixel_ratio()
            );
        }
        self.refresh_title();

        if let Some(w) = &self.window {
            w.pre_present_notify();
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs: WindowAttributes = Window::default_attributes()
            .with_title("studio-scene")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.size.0 as f64,
                self.size.1 as f64,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.error = Some(EngineError::Window(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        let physical = window.inner_size();
        self.input
            .set_viewport(physical.width as f32, physical.height as f32);

        self.window = Some(window);
        self.last_frame = Some(Instant::now());
        self.refresh_title();

        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.input
                    .set_viewport(size.width as f32, size.height as f32);
                if let Some(w) = &self.window {
                    let logical = size.to_logical::<f32>(w.scale_factor());
                    self.runtime.set_viewport_height(logical.height);
                    w.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            other => {
                self.input.handle_window_event(&other);
            }
        }
    }
}
