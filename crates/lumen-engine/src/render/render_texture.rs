use std::rc::Rc;

use crate::coords::{Vector2f, Viewport};
use crate::paint::Rgba;

use super::common::TEXTURE_FORMAT;
use super::target::{Canvas, RenderTarget};
use super::texture::Texture;
use super::RenderCtx;

/// Whether a render texture can be drawn into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramebufferStatus {
    Complete,
    ZeroSize,
    TooLarge { max: u32 },
}

impl FramebufferStatus {
    pub fn evaluate(width: u32, height: u32, max_dimension: u32) -> Self {
        if width == 0 || height == 0 {
            FramebufferStatus::ZeroSize
        } else if width > max_dimension || height > max_dimension {
            FramebufferStatus::TooLarge { max: max_dimension }
        } else {
            FramebufferStatus::Complete
        }
    }
}

/// Status plus the one-time warning for incomplete framebuffers.
#[derive(Debug)]
struct FramebufferState {
    status: FramebufferStatus,
    size: (u32, u32),
    warned: bool,
    warnings: u32,
}

impl FramebufferState {
    fn new(width: u32, height: u32, max_dimension: u32) -> Self {
        Self {
            status: FramebufferStatus::evaluate(width, height, max_dimension),
            size: (width, height),
            warned: false,
            warnings: 0,
        }
    }

    /// True when drawing may proceed; warns on the first refusal only.
    fn ready(&mut self) -> bool {
        if self.status == FramebufferStatus::Complete {
            return true;
        }
        if !self.warned {
            let (w, h) = self.size;
            log::warn!("render texture {w}x{h} is incomplete ({:?}); draws skipped", self.status);
            self.warned = true;
            self.warnings += 1;
        }
        false
    }
}

/// A texture that can be drawn into and then sampled like any other.
///
/// ```ignore
/// let mut thumb = RenderTexture::create(&ctx, 256, 256);
/// thumb.render(&mut canvas, Some(Rgba::BLACK), |c| c.render(&mut shape, None, None));
/// preview.set_texture(Some(thumb.texture()));
/// ```
pub struct RenderTexture {
    texture: Rc<Texture>,
    state: FramebufferState,
}

impl RenderTexture {
    /// Allocates a `width x height` colour attachment. An incomplete
    /// status (zero or oversized dimension) allocates nothing.
    pub fn create(ctx: &RenderCtx<'_>, width: u32, height: u32) -> Self {
        let state = FramebufferState::new(width, height, ctx.max_texture_dimension());
        let texture = if state.status == FramebufferStatus::Complete {
            Texture::render_attachment(ctx, width, height)
        } else {
            Texture::invalid()
        };
        Self {
            texture: Rc::new(texture),
            state,
        }
    }

    /// Runs `draw` against a canvas targeting this texture, optionally
    /// clearing it first. Drawing shares `parent`'s frame encoder; `parent`
    /// is the active target again once this returns.
    ///
    /// Returns `false` without calling `draw` when the framebuffer is
    /// incomplete.
    pub fn render(
        &mut self,
        parent: &mut dyn RenderTarget,
        clear: Option<Rgba>,
        draw: impl FnOnce(&mut Canvas<'_>),
    ) -> bool {
        if !self.state.ready() {
            return false;
        }
        let Some(view) = self.texture.view() else {
            return false;
        };

        let (width, height) = self.state.size;
        let mut parent_canvas = parent.canvas();
        let mut canvas = parent_canvas.redirect(
            view,
            TEXTURE_FORMAT,
            Viewport::new(width as f32, height as f32),
        );
        if let Some(color) = clear {
            canvas.clear(color);
        }
        draw(&mut canvas);
        true
    }

    /// Shared handle for sampling the rendered contents.
    #[inline]
    pub fn texture(&self) -> Rc<Texture> {
        Rc::clone(&self.texture)
    }

    #[inline]
    pub fn status(&self) -> FramebufferStatus {
        self.state.status
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state.status == FramebufferStatus::Complete
    }

    #[inline]
    pub fn size(&self) -> Vector2f {
        let (w, h) = self.state.size;
        Vector2f::new(w as f32, h as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    /// A target that must never be reached.
    struct Untouchable;

    impl RenderTarget for Untouchable {
        fn transform(&self) -> Transform { Transform::identity() }
        fn set_transform(&mut self, _: Transform) {}
        fn size(&self) -> Vector2f { Vector2f::new(1.0, 1.0) }
        fn canvas(&mut self) -> Canvas<'_> { panic!("incomplete render texture touched its parent") }
    }

    fn incomplete(width: u32, height: u32) -> RenderTexture {
        RenderTexture {
            texture: Rc::new(Texture::invalid()),
            state: FramebufferState::new(width, height, 8192),
        }
    }

    // ── status ────────────────────────────────────────────────────────────

    #[test]
    fn status_evaluation() {
        assert_eq!(FramebufferStatus::evaluate(64, 64, 8192), FramebufferStatus::Complete);
        assert_eq!(FramebufferStatus::evaluate(0, 64, 8192), FramebufferStatus::ZeroSize);
        assert_eq!(FramebufferStatus::evaluate(64, 0, 8192), FramebufferStatus::ZeroSize);
        assert_eq!(
            FramebufferStatus::evaluate(8193, 1, 8192),
            FramebufferStatus::TooLarge { max: 8192 }
        );
        assert_eq!(FramebufferStatus::evaluate(8192, 8192, 8192), FramebufferStatus::Complete);
    }

    // ── incomplete framebuffer ────────────────────────────────────────────

    #[test]
    fn incomplete_never_draws_and_warns_once() {
        let mut rt = incomplete(0, 128);
        assert!(!rt.is_complete());

        let mut drew = false;
        for _ in 0..3 {
            assert!(!rt.render(&mut Untouchable, Some(Rgba::BLACK), |_| drew = true));
        }
        assert!(!drew);
        assert_eq!(rt.state.warnings, 1);
    }

    #[test]
    fn oversized_is_incomplete() {
        let mut rt = incomplete(10_000, 16);
        assert_eq!(rt.status(), FramebufferStatus::TooLarge { max: 8192 });
        assert!(!rt.render(&mut Untouchable, None, |_| {}));
        assert!(!rt.texture().valid());
        assert_eq!(rt.size(), Vector2f::new(10_000.0, 16.0));
    }
}
