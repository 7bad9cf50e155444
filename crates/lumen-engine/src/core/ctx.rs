use winit::window::{Window, WindowId};

use crate::context::GraphicsContext;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::paint::Rgba;
use crate::render::{Canvas, RenderCtx};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Drawable size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Passed to [`App::on_realize`](super::App::on_realize).
pub struct SetupCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu<'w>,
    pub graphics: &'a mut GraphicsContext,
}

impl SetupCtx<'_, '_> {
    /// For creating textures and shaders ahead of the first frame.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        self.gpu.render_ctx()
    }
}

/// Passed to [`App::on_frame`].
///
/// `'a` is the callback, `'w` the window borrow held by [`Gpu`].
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub graphics: &'a mut GraphicsContext,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        self.gpu.render_ctx()
    }

    /// Acquires the next frame, clears it to `clear`, runs `draw` against
    /// the window canvas and presents.
    ///
    /// A minimised window or a lost or outdated surface skips the frame;
    /// running out of memory returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: Rgba, draw: F) -> AppControl
    where
        F: FnOnce(&mut Canvas<'_>),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            // minimised
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        self.graphics.begin_frame();

        // canvas borrows the encoder; dropped before submit takes the frame
        {
            let ctx = self.gpu.render_ctx();
            let mut canvas = Canvas::new(ctx, self.graphics, &mut frame.encoder, &frame.view);
            canvas.clear(clear);
            draw(&mut canvas);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }
}
