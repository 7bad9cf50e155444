use std::collections::HashMap;
use std::rc::Rc;

use crate::coords::Vector2f;
use crate::render::{Image, RenderCtx, Texture};

use super::font::{FontFamily, FontId, FontVariant};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct GlyphKey {
    font: FontId,
    variant: FontVariant,
    ch: char,
    size_bits: u32,
}

/// A rasterized glyph bitmap and where it sits relative to the pen.
#[derive(Debug, Clone)]
pub(crate) struct RasterGlyph {
    /// `None` for glyphs with no pixels (spaces).
    pub texture: Option<Rc<Texture>>,
    /// `(xmin, ymin)`: left bearing and bottom edge above the baseline.
    pub offset: Vector2f,
    pub size: Vector2f,
}

/// One texture per (font, face, char, size), kept for the cache's lifetime.
#[derive(Debug, Default)]
pub(crate) struct GlyphCache {
    entries: HashMap<GlyphKey, RasterGlyph>,
}

impl GlyphCache {
    pub(crate) fn get_or_rasterize(
        &mut self,
        ctx: &RenderCtx<'_>,
        family: &FontFamily,
        font: &FontId,
        variant: FontVariant,
        ch: char,
        size: f32,
    ) -> RasterGlyph {
        let key = GlyphKey {
            font: font.clone(),
            variant,
            ch,
            size_bits: size.to_bits(),
        };
        self.entries
            .entry(key)
            .or_insert_with(|| rasterize(ctx, family, variant, ch, size))
            .clone()
    }

    /// Drops every bitmap rasterized from `font`. Returns how many went.
    pub(crate) fn evict_font(&mut self, font: &FontId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| &key.font != font);
        before - self.entries.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn insert_blank(&mut self, font: &FontId, ch: char, size: f32) {
        let key = GlyphKey {
            font: font.clone(),
            variant: FontVariant::Regular,
            ch,
            size_bits: size.to_bits(),
        };
        let glyph = RasterGlyph { texture: None, offset: Vector2f::new(0.0, 0.0), size: Vector2f::new(0.0, 0.0) };
        self.entries.insert(key, glyph);
    }
}

fn rasterize(ctx: &RenderCtx<'_>, family: &FontFamily, variant: FontVariant, ch: char, size: f32) -> RasterGlyph {
    let (metrics, coverage) = family.face(variant).rasterize(ch, size);
    let texture = Image::from_coverage(metrics.width as u32, metrics.height as u32, &coverage)
        .filter(|img| !img.is_empty())
        .map(|img| Rc::new(Texture::create_from(ctx, &img)));

    RasterGlyph {
        texture,
        offset: Vector2f::new(metrics.xmin as f32, metrics.ymin as f32),
        size: Vector2f::new(metrics.width as f32, metrics.height as f32),
    }
}
