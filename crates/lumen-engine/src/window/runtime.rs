use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::context::GraphicsContext;
use crate::core::{App, AppControl, FrameCtx, SetupCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
        }
    }
}

/// Requests an app can make from [`App::on_frame`]. Applied once the
/// frame callback has returned.
#[derive(Default)]
pub struct RuntimeCtx {
    pending: Vec<Request>,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.pending.push(Request::Open(config));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.pending.push(Request::Close(id));
    }

    pub fn exit(&mut self) {
        self.pending.push(Request::Exit);
    }
}

enum Request {
    Open(RuntimeConfig),
    Close(WindowId),
    Exit,
}

pub struct Runtime;

impl Runtime {
    /// Opens the initial window and blocks until the last window closes or
    /// the app asks to exit.
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exit_requested: false,
            shut_down: false,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")
    }
}

/// Everything one window owns. `gpu` borrows `window`.
#[self_referencing]
struct WindowSlot {
    graphics: GraphicsContext,
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowSlot {
    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }
}

struct Driver<A: App + 'static> {
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowSlot>,
    exit_requested: bool,
    shut_down: bool,
}

impl<A: App + 'static> Driver<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop, config: RuntimeConfig) -> Result<WindowId> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(config.title)
                    .with_inner_size(config.initial_size)
                    .with_resizable(config.resizable),
            )
            .context("failed to create window")?;
        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let mut slot = WindowSlotTryBuilder {
            graphics: GraphicsContext::new(),
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let app = &mut self.app;
        slot.with_mut(|v| {
            app.on_realize(&mut SetupCtx {
                window: WindowCtx { id, window: v.window },
                gpu: &*v.gpu,
                graphics: v.graphics,
            });
            // asset loading should not show up as the first frame's dt
            v.clock.reset();
        });

        log::info!("window {id:?} realized");
        slot.request_redraw();
        self.windows.insert(id, slot);
        Ok(id)
    }

    fn close(&mut self, id: WindowId) {
        if self.windows.remove(&id).is_some() {
            log::info!("window {id:?} closed");
        }
    }

    fn resize(&mut self, id: WindowId, size: Option<PhysicalSize<u32>>) {
        let Some(slot) = self.windows.get_mut(&id) else {
            return;
        };
        let size = size.unwrap_or_else(|| slot.with_window(|w| w.inner_size()));
        slot.with_gpu_mut(|gpu| gpu.resize(size));
        self.app.on_resize(size.width, size.height);
        slot.request_redraw();
    }

    /// Runs one `on_frame` for `id` and applies what it asked for.
    fn frame(&mut self, event_loop: &ActiveEventLoop, id: WindowId) {
        let Some(slot) = self.windows.get_mut(&id) else {
            return;
        };

        let mut runtime = RuntimeCtx::default();
        let app = &mut self.app;
        let (control, close_requested) = slot.with_mut(|v| {
            let time = v.clock.tick();
            let control = app.on_frame(&mut FrameCtx {
                window: WindowCtx { id, window: v.window },
                gpu: v.gpu,
                graphics: v.graphics,
                input: v.input,
                input_frame: v.input_frame,
                time,
                runtime: &mut runtime,
            });
            let close_requested = v.input_frame.close_requested();
            v.input_frame.clear();
            (control, close_requested)
        });

        // the app has had one frame to react to the close request
        if close_requested {
            runtime.close_window(id);
        }
        if control == AppControl::Exit {
            runtime.exit();
        }
        self.apply(event_loop, runtime);
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, runtime: RuntimeCtx) {
        for request in runtime.pending {
            match request {
                Request::Open(config) => {
                    if let Err(e) = self.open(event_loop, config) {
                        log::error!("failed to create window: {e:#}");
                        self.exit_requested = true;
                    }
                }
                Request::Close(id) => self.close(id),
                Request::Exit => self.exit_requested = true,
            }
        }

        if self.windows.is_empty() {
            self.exit_requested = true;
        }
        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }
        if let Err(e) = self.open(event_loop, self.initial.clone()) {
            log::error!("failed to create initial window: {e:#}");
            self.exit_requested = true;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // animation runs every frame
        event_loop.set_control_flow(ControlFlow::Wait);
        for slot in self.windows.values() {
            slot.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        let Some(slot) = self.windows.get_mut(&id) else {
            return;
        };

        if let Some(input) = translate_window_event(&event) {
            slot.with_mut(|v| v.input.apply_event(v.input_frame, input));
        }

        match event {
            // seen by the app through InputFrame; the window closes after that frame
            WindowEvent::CloseRequested => slot.request_redraw(),
            WindowEvent::Resized(size) => self.resize(id, Some(size)),
            WindowEvent::ScaleFactorChanged { .. } => self.resize(id, None),
            WindowEvent::RedrawRequested => self.frame(event_loop, id),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.shut_down {
            self.shut_down = true;
            self.app.on_shutdown();
        }
        self.windows.clear();
    }
}
