use super::ctx::{FrameCtx, SetupCtx};

/// Returned by [`App::on_frame`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Lifecycle hooks, invoked by the runtime in this order: `on_realize`
/// once per window after its GPU is ready, then `on_resize` and
/// `on_frame` as the window lives, and `on_shutdown` once when the event
/// loop exits.
pub trait App {
    /// Load fonts and create textures or shaders here.
    fn on_realize(&mut self, ctx: &mut SetupCtx<'_, '_>) {
        let _ = ctx;
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// New drawable size in physical pixels.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    fn on_shutdown(&mut self) {}
}
