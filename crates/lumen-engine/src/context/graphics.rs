use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::render::resources::GpuResources;
use crate::render::RenderCtx;
use crate::text::glyph_cache::{GlyphCache, RasterGlyph};
use crate::text::{FontCache, FontFamily, FontId, FontLoadError, FontVariant};

use super::ColorSelection;

/// Everything shared between draws on one device: the passthrough shader
/// program, bind-group layouts, samplers, the per-frame uniform arena,
/// fonts, rasterized glyphs and the colour selection.
///
/// Owned by the application (the runtime keeps one per window) and passed
/// to whatever needs it. GPU state is created lazily on first draw.
#[derive(Default)]
pub struct GraphicsContext {
    gpu: GpuResources,
    fonts: FontCache,
    glyphs: GlyphCache,
    font_generations: HashMap<FontId, u64>,
    colors: ColorSelection,
}

impl fmt::Debug for GraphicsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsContext")
            .field("fonts", &self.fonts)
            .field("glyphs", &self.glyphs.len())
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl GraphicsContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn gpu_mut(&mut self) -> &mut GpuResources {
        &mut self.gpu
    }

    #[inline]
    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    /// Loads `id` from `dir` unless it is already registered.
    pub fn load_fonts(&mut self, dir: impl AsRef<Path>, id: &FontId) -> Result<(), FontLoadError> {
        self.fonts.load_dir(dir, id).map(|_| ())
    }

    /// Registers `family` under `id`. Replacing a family drops its
    /// rasterized glyphs and bumps its generation so text relayouts.
    pub fn insert_font(&mut self, id: FontId, family: FontFamily) {
        if self.fonts.insert(id.clone(), family) {
            self.font_replaced(&id);
        }
    }

    /// Changes every time the family registered under `id` is replaced.
    #[inline]
    pub fn font_generation(&self, id: &FontId) -> u64 {
        self.font_generations.get(id).copied().unwrap_or(0)
    }

    fn font_replaced(&mut self, id: &FontId) {
        let evicted = self.glyphs.evict_font(id);
        *self.font_generations.entry(id.clone()).or_default() += 1;
        log::debug!("font {id} replaced, evicted {evicted} glyphs");
    }

    #[inline]
    pub fn colors(&self) -> &ColorSelection {
        &self.colors
    }

    #[inline]
    pub fn colors_mut(&mut self) -> &mut ColorSelection {
        &mut self.colors
    }

    /// Number of glyph bitmaps rasterized so far.
    #[inline]
    pub fn cached_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    /// Starts a new frame: recycles the uniform arena and drops texture
    /// bindings no draw has used for a while.
    pub fn begin_frame(&mut self) {
        self.gpu.begin_frame();
    }

    /// Rasterizes on first request; `None` when the font is unknown.
    pub(crate) fn glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        font: &FontId,
        variant: FontVariant,
        ch: char,
        size: f32,
    ) -> Option<RasterGlyph> {
        let family = self.fonts.get(font).ok()?;
        Some(self.glyphs.get_or_rasterize(ctx, family, font, variant, ch, size))
    }
}
